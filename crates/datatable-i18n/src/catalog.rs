//! Locale bound message catalog

use std::collections::HashMap;

use crate::translator::Translator;

/// How a locale picks one of several plural forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
	/// A single form for every count
	Invariant,
	/// `one` for exactly 1, `other` otherwise
	OneOther,
	/// `one` for 0 and 1, `other` from 2 upward
	ZeroOneOther,
	/// Three forms chosen from the last two digits (East Slavic, BCS)
	Slavic,
	/// Like [`PluralRule::Slavic`] with `one` reserved for exactly 1
	Polish,
}

impl PluralRule {
	/// Rule for a locale tag such as `pt_BR` or `ru-RU`
	pub fn for_locale(locale: &str) -> Self {
		let mut parts = locale.split(['-', '_']);
		let language = parts.next().unwrap_or_default();
		let region = parts.next();

		match (language, region) {
			("ja" | "zh" | "ko" | "vi" | "th" | "id" | "tr", _) => Self::Invariant,
			("fr", _) | ("pt", Some("BR")) => Self::ZeroOneOther,
			("ru" | "uk" | "be" | "sr" | "hr" | "bs", _) => Self::Slavic,
			("pl", _) => Self::Polish,
			_ => Self::OneOther,
		}
	}

	/// Index of the form to use for `count`
	pub fn index(self, count: usize) -> usize {
		let few = |n: usize| matches!(n % 10, 2..=4) && !matches!(n % 100, 12..=14);

		match self {
			Self::Invariant => 0,
			Self::OneOther => usize::from(count != 1),
			Self::ZeroOneOther => usize::from(count > 1),
			Self::Slavic if count % 10 == 1 && count % 100 != 11 => 0,
			Self::Polish if count == 1 => 0,
			Self::Slavic | Self::Polish if few(count) => 1,
			Self::Slavic | Self::Polish => 2,
		}
	}
}

/// A catalog of translated messages for one locale
///
/// Context-free messages and messages scoped to a context share one table
/// keyed by `(context, msgid)`.
///
/// # Example
/// ```
/// use datatable_i18n::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add_translation("Delete", "Supprimer");
/// catalog.add_plural("row", vec!["ligne".to_string(), "lignes".to_string()]);
///
/// assert_eq!(catalog.get("Delete"), Some("Supprimer"));
/// assert_eq!(catalog.get_plural("row", 0), Some("ligne"));
/// assert_eq!(catalog.get_plural("row", 4), Some("lignes"));
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	rule: PluralRule,
	entries: HashMap<(Option<String>, String), String>,
	forms: HashMap<String, Vec<String>>,
	plain: usize,
}

impl MessageCatalog {
	/// Create an empty catalog for `locale`
	pub fn new(locale: &str) -> Self {
		Self {
			locale: locale.to_string(),
			rule: PluralRule::for_locale(locale),
			entries: HashMap::new(),
			forms: HashMap::new(),
			plain: 0,
		}
	}

	/// Locale served by this catalog
	pub fn locale(&self) -> &str {
		&self.locale
	}

	/// Plural rule derived from the locale
	pub fn plural_rule(&self) -> PluralRule {
		self.rule
	}

	fn insert(&mut self, context: Option<String>, message: String, translation: String) {
		let plain = context.is_none();
		if self.entries.insert((context, message), translation).is_none() && plain {
			self.plain += 1;
		}
	}

	fn lookup(&self, context: Option<&str>, message: &str) -> Option<&str> {
		// tuple keys cannot be borrowed as (Option<&str>, &str)
		let key = (context.map(str::to_owned), message.to_owned());
		self.entries.get(&key).map(String::as_str)
	}

	/// Add a simple translation
	pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.insert(None, message.into(), translation.into());
	}

	/// Add every pair of `translations`
	pub fn extend<I, K, V>(&mut self, translations: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		translations
			.into_iter()
			.for_each(|(message, translation)| self.add_translation(message, translation));
	}

	/// Add the plural forms of a message
	pub fn add_plural(&mut self, singular: impl Into<String>, forms: Vec<String>) {
		self.forms.insert(singular.into(), forms);
	}

	/// Add a translation that only applies inside `context`
	pub fn add_context(
		&mut self,
		context: impl Into<String>,
		message: impl Into<String>,
		translation: impl Into<String>,
	) {
		self.insert(Some(context.into()), message.into(), translation.into());
	}

	/// Get a translation
	pub fn get(&self, message: &str) -> Option<&str> {
		self.lookup(None, message)
	}

	/// Get the plural form of `singular` matching `count`
	///
	/// A catalog holding fewer forms than the rule asks for falls back to
	/// its last one.
	pub fn get_plural(&self, singular: &str, count: usize) -> Option<&str> {
		let forms = self.forms.get(singular)?;
		let index = self.rule.index(count).min(forms.len().saturating_sub(1));
		forms.get(index).map(String::as_str)
	}

	/// Get a translation scoped to `context`
	pub fn get_context(&self, context: &str, message: &str) -> Option<&str> {
		self.lookup(Some(context), message)
	}

	/// Number of simple translations
	pub fn len(&self) -> usize {
		self.plain
	}

	/// Whether the catalog holds no simple translations
	pub fn is_empty(&self) -> bool {
		self.plain == 0
	}
}

impl Translator for MessageCatalog {
	fn translate(&self, message: &str) -> String {
		self.get(message).unwrap_or(message).to_string()
	}

	fn locale(&self) -> Option<&str> {
		Some(&self.locale)
	}
}
