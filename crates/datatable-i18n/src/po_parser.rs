//! Gettext `.po` loading
//!
//! Only the subset used for label catalogs is understood: `msgctxt`,
//! `msgid`, `msgid_plural`, `msgstr`, `msgstr[n]` and quoted continuation
//! lines. Comments and the header entry are skipped.

use std::io::Read;

use crate::MessageCatalog;

/// Errors raised while reading a `.po` catalog
#[derive(Debug, thiserror::Error)]
pub enum PoParseError {
	/// The source could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// A line is not valid gettext syntax
	#[error("Parse error at line {line}: {message}")]
	Syntax {
		/// One-based line number
		line: usize,
		/// What was wrong with the line
		message: String,
	},
}

/// Which keyword a continuation line extends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
	Context,
	Id,
	Plural,
	Str(usize),
}

#[derive(Debug, Default)]
struct Entry {
	context: Option<String>,
	id: Option<String>,
	plural: Option<String>,
	strings: Vec<String>,
}

impl Entry {
	fn flush_into(self, catalog: &mut MessageCatalog) {
		let Some(id) = self.id.filter(|id| !id.is_empty()) else {
			return;
		};

		match (self.context, self.plural) {
			(Some(context), _) => {
				if let Some(translation) = self.strings.into_iter().next() {
					catalog.add_context(context, id, translation);
				}
			}
			(None, Some(_)) => catalog.add_plural(id, self.strings),
			(None, None) => {
				if let Some(translation) = self.strings.into_iter().next() {
					if !translation.is_empty() {
						catalog.add_translation(id, translation);
					}
				}
			}
		}
	}
}

/// Parse a `.po` document held in memory
///
/// # Examples
///
/// ```
/// use datatable_i18n::parse_po_str;
///
/// let catalog = parse_po_str("msgid \"Name\"\nmsgstr \"Nome\"\n", "pt_BR").unwrap();
/// assert_eq!(catalog.get("Name"), Some("Nome"));
/// ```
pub fn parse_po_str(source: &str, locale: &str) -> Result<MessageCatalog, PoParseError> {
	let mut catalog = MessageCatalog::new(locale);
	let mut entry = Entry::default();
	let mut field: Option<Field> = None;

	for (index, raw) in source.lines().enumerate() {
		let line = raw.trim();
		let line_no = index + 1;

		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		if line.starts_with('"') {
			let text = quoted(line, line_no)?;
			match field {
				Some(Field::Context) => push_to(&mut entry.context, &text),
				Some(Field::Id) => push_to(&mut entry.id, &text),
				Some(Field::Plural) => push_to(&mut entry.plural, &text),
				Some(Field::Str(n)) => {
					if let Some(existing) = entry.strings.get_mut(n) {
						existing.push_str(&text);
					}
				}
				None => {
					return Err(PoParseError::Syntax {
						line: line_no,
						message: "continuation string without a keyword".to_string(),
					});
				}
			}
			continue;
		}

		let (keyword, rest) = line.split_once(char::is_whitespace).ok_or_else(|| {
			PoParseError::Syntax {
				line: line_no,
				message: format!("expected a keyword and a quoted string, got '{line}'"),
			}
		})?;
		let text = quoted(rest.trim(), line_no)?;

		match keyword {
			"msgctxt" => {
				std::mem::take(&mut entry).flush_into(&mut catalog);
				entry.context = Some(text);
				field = Some(Field::Context);
			}
			"msgid" => {
				if entry.id.is_some() {
					std::mem::take(&mut entry).flush_into(&mut catalog);
				}
				entry.id = Some(text);
				field = Some(Field::Id);
			}
			"msgid_plural" => {
				entry.plural = Some(text);
				field = Some(Field::Plural);
			}
			"msgstr" => {
				entry.strings = vec![text];
				field = Some(Field::Str(0));
			}
			other => {
				let n = other
					.strip_prefix("msgstr[")
					.and_then(|s| s.strip_suffix(']'))
					.and_then(|s| s.parse::<usize>().ok())
					.ok_or_else(|| PoParseError::Syntax {
						line: line_no,
						message: format!("unknown keyword '{other}'"),
					})?;
				if entry.strings.len() <= n {
					entry.strings.resize(n + 1, String::new());
				}
				entry.strings[n] = text;
				field = Some(Field::Str(n));
			}
		}
	}

	entry.flush_into(&mut catalog);
	tracing::debug!(locale, messages = catalog.len(), "po catalog loaded");
	Ok(catalog)
}

/// Parse a `.po` document from a reader
pub fn parse_po_reader<R: Read>(mut reader: R, locale: &str) -> Result<MessageCatalog, PoParseError> {
	let mut source = String::new();
	reader.read_to_string(&mut source)?;
	parse_po_str(&source, locale)
}

fn push_to(target: &mut Option<String>, text: &str) {
	target.get_or_insert_with(String::new).push_str(text);
}

fn quoted(value: &str, line: usize) -> Result<String, PoParseError> {
	let inner = value
		.strip_prefix('"')
		.and_then(|v| v.strip_suffix('"'))
		.ok_or_else(|| PoParseError::Syntax {
			line,
			message: format!("expected a quoted string, got '{value}'"),
		})?;
	Ok(unescape(inner))
}

fn unescape(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	let mut chars = s.chars();
	while let Some(ch) = chars.next() {
		if ch != '\\' {
			out.push(ch);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some('r') => out.push('\r'),
			Some('"') => out.push('"'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => out.push('\\'),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_simple_entries() {
		let source = r#"
msgid ""
msgstr "Content-Type: text/plain; charset=UTF-8\n"

msgid "Name"
msgstr "Nome"

msgid "Description"
msgstr "Descrição"
"#;

		let catalog = parse_po_str(source, "pt_BR").unwrap();
		assert_eq!(catalog.get("Name"), Some("Nome"));
		assert_eq!(catalog.get("Description"), Some("Descrição"));
		assert_eq!(catalog.len(), 2);
	}

	#[rstest]
	fn test_parse_plural_and_context() {
		let source = r#"
msgid "row"
msgid_plural "rows"
msgstr[0] "ligne"
msgstr[1] "lignes"

msgctxt "button"
msgid "Open"
msgstr "Ouvrir"
"#;

		let catalog = parse_po_str(source, "fr").unwrap();
		assert_eq!(catalog.get_plural("row", 1), Some("ligne"));
		assert_eq!(catalog.get_plural("row", 3), Some("lignes"));
		assert_eq!(catalog.get_context("button", "Open"), Some("Ouvrir"));
	}

	#[rstest]
	fn test_parse_continuation_and_escapes() {
		let source = "# comment\nmsgid \"Click \"\n\"to edit\"\nmsgstr \"Clique \\\"aqui\\\"\"\n\"\\tpara editar\"\n";

		let catalog = parse_po_str(source, "pt_BR").unwrap();
		assert_eq!(
			catalog.get("Click to edit"),
			Some("Clique \"aqui\"\tpara editar")
		);
	}

	#[rstest]
	fn test_untranslated_entries_are_skipped() {
		let catalog = parse_po_str("msgid \"Name\"\nmsgstr \"\"\n", "de").unwrap();
		assert_eq!(catalog.get("Name"), None);
	}

	#[rstest]
	#[case("msgid Name", 1)]
	#[case("\"orphan\"", 1)]
	#[case("msgid \"a\"\nmsgfoo \"b\"", 2)]
	fn test_syntax_errors_report_line(#[case] source: &str, #[case] expected_line: usize) {
		let err = parse_po_str(source, "en").unwrap_err();
		match err {
			PoParseError::Syntax { line, .. } => assert_eq!(line, expected_line),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_parse_from_reader() {
		let catalog = parse_po_reader("msgid \"Edit\"\nmsgstr \"Editar\"\n".as_bytes(), "es").unwrap();
		assert_eq!(catalog.get("Edit"), Some("Editar"));
	}
}
