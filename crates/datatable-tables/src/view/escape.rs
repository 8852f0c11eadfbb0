//! HTML escaping used by the default view

use serde_json::Value;

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use datatable_tables::view::escape::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
	let mut escaped = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'&' => escaped.push_str("&amp;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Script variable name for an element id
///
/// Characters a JavaScript identifier cannot hold become `_`, and a leading
/// digit gets a `_` prefix.
///
/// ```
/// use datatable_tables::view::escape::js_identifier;
///
/// assert_eq!(js_identifier("grid-users"), "grid_users");
/// assert_eq!(js_identifier("2024"), "_2024");
/// ```
pub fn js_identifier(id: &str) -> String {
	let mut ident: String = id
		.chars()
		.map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
		.collect();
	if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
		ident.insert(0, '_');
	}
	ident
}

/// Text form of an attribute value
///
/// Lists are joined with spaces, maps are written as JSON and `null` or
/// `false` yield nothing.
pub fn attribute_text(value: &Value) -> Option<String> {
	match value {
		Value::Null | Value::Bool(false) => None,
		Value::Bool(true) => Some("1".to_string()),
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Array(items) => Some(
			items
				.iter()
				.filter_map(attribute_text)
				.collect::<Vec<_>>()
				.join(" "),
		),
		Value::Object(_) => Some(value.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("plain", "plain")]
	#[case("<script>", "&lt;script&gt;")]
	#[case("a & b", "a &amp; b")]
	#[case("", "")]
	fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_html(input), expected);
	}

	#[rstest]
	#[case(json!("x"), Some("x"))]
	#[case(json!(["a", "b"]), Some("a b"))]
	#[case(json!(3), Some("3"))]
	#[case(json!(true), Some("1"))]
	#[case(json!(false), None)]
	#[case(json!(null), None)]
	fn test_attribute_text(#[case] value: Value, #[case] expected: Option<&str>) {
		assert_eq!(attribute_text(&value).as_deref(), expected);
	}

	#[rstest]
	#[case("users", "users")]
	#[case("grid-users", "grid_users")]
	#[case("a.b c", "a_b_c")]
	#[case("9lives", "_9lives")]
	#[case("", "_")]
	fn test_js_identifier(#[case] id: &str, #[case] expected: &str) {
		assert_eq!(js_identifier(id), expected);
	}
}
