//! Name filtering and array notation helpers
//!
//! Element and table names may only hold ASCII letters, digits, underscores
//! and characters at or above `0x7f` (every byte of a multi-byte UTF-8
//! sequence falls in the extended range); brackets are kept when array
//! notation is allowed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{TableError, TableResult};

static DISALLOWED: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\x{7f}-\x{10FFFF}]").expect("valid name pattern"));

static DISALLOWED_WITH_BRACKETS: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"[^\[\]a-zA-Z0-9_\x{7f}-\x{10FFFF}]").expect("valid name pattern"));

/// Remove every character that is not allowed in a name
///
/// # Examples
///
/// ```
/// use datatable_tables::name::filter_name;
///
/// assert_eq!(filter_name("user name!", false), "username");
/// assert_eq!(filter_name("tags[]", true), "tags[]");
/// assert_eq!(filter_name("tags[]", false), "tags");
/// ```
pub fn filter_name(value: &str, allow_brackets: bool) -> String {
	let pattern = if allow_brackets {
		&DISALLOWED_WITH_BRACKETS
	} else {
		&DISALLOWED
	};
	pattern.replace_all(value, "").into_owned()
}

/// Filter `value` and reject it when nothing is left
pub fn validate_name(value: &str) -> TableResult<String> {
	let filtered = filter_name(value, false);
	if filtered.is_empty() {
		return Err(TableError::NameValidation(value.to_string()));
	}
	Ok(filtered)
}

/// Derive an HTML id from a fully qualified name
///
/// A trailing `[]` is dropped and remaining brackets become dashes.
///
/// # Examples
///
/// ```
/// use datatable_tables::name::id_from_name;
///
/// assert_eq!(id_from_name("users"), "users");
/// assert_eq!(id_from_name("users[]"), "users");
/// assert_eq!(id_from_name("grid[users][name]"), "grid-users-name");
/// ```
pub fn id_from_name(fully_qualified: &str) -> String {
	if !fully_qualified.contains('[') {
		return fully_qualified.to_string();
	}

	let stripped = fully_qualified
		.strip_suffix("[]")
		.unwrap_or(fully_qualified);
	stripped
		.replace("][", "-")
		.replace(['[', ']'], "-")
		.trim_matches('-')
		.to_string()
}

/// Last key of an array notation path
///
/// `foo[bar][baz]` yields `baz`; anything without a closing bracket is
/// returned as is.
pub fn array_leaf(value: &str) -> &str {
	if !value.ends_with(']') {
		return value;
	}
	match value.rfind('[') {
		Some(start) => &value[start + 1..value.len() - 1],
		None => value,
	}
}

/// Upper-case the first character, leaving the rest untouched
pub fn ucfirst(value: &str) -> String {
	let mut chars = value.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("nome", "nome")]
	#[case("user-name", "username")]
	#[case("  desc  ", "desc")]
	#[case("a.b/c", "abc")]
	#[case("caf\u{e9}", "caf\u{e9}")]
	#[case("btn_1", "btn_1")]
	fn test_filter_name(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(filter_name(input, false), expected);
	}

	#[rstest]
	fn test_filter_name_keeps_non_ascii() {
		assert_eq!(filter_name("名前 x", false), "名前x");
	}

	#[rstest]
	fn test_validate_name_rejects_empty() {
		let err = validate_name("!!!").unwrap_err();
		assert!(matches!(err, TableError::NameValidation(ref v) if v == "!!!"));
		assert!(validate_name("").is_err());
	}

	#[rstest]
	fn test_validate_name_filters() {
		assert_eq!(validate_name("e-mail").unwrap(), "email");
	}

	#[rstest]
	#[case("plain", "plain")]
	#[case("list[]", "list")]
	#[case("a[b]", "a-b")]
	#[case("a[b][c][]", "a-b-c")]
	fn test_id_from_name(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(id_from_name(input), expected);
	}

	#[rstest]
	#[case("foo[bar][baz]", "baz")]
	#[case("foo", "foo")]
	#[case("foo[", "foo[")]
	fn test_array_leaf(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(array_leaf(input), expected);
	}

	#[rstest]
	#[case("text", "Text")]
	#[case("Button", "Button")]
	#[case("", "")]
	fn test_ucfirst(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(ucfirst(input), expected);
	}

	proptest! {
		#[test]
		fn test_filter_name_is_idempotent(input in ".*", brackets in any::<bool>()) {
			let once = filter_name(&input, brackets);
			prop_assert_eq!(filter_name(&once, brackets), once.clone());
		}

		#[test]
		fn test_valid_names_are_unchanged(input in "[a-zA-Z0-9_]{1,24}") {
			prop_assert_eq!(filter_name(&input, false), input);
		}
	}
}
