//! The translator seam and the process-wide default slot

use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Translates user-facing messages such as element labels
pub trait Translator: Debug + Send + Sync {
	/// Returns the translation of `message`, or `message` itself when none is known
	fn translate(&self, message: &str) -> String;

	/// Locale served by this translator, if it has one
	fn locale(&self) -> Option<&str> {
		None
	}
}

/// Reference-counted translator handle shared between tables and elements
pub type SharedTranslator = Arc<dyn Translator>;

/// Translator that returns every message unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
	fn translate(&self, message: &str) -> String {
		message.to_string()
	}
}

static DEFAULT_TRANSLATOR: Lazy<RwLock<Option<SharedTranslator>>> =
	Lazy::new(|| RwLock::new(None));

/// Installs the process-wide default translator
///
/// Tables and elements without a translator of their own fall back to it,
/// unless translation has been disabled on them.
pub fn set_default_translator(translator: SharedTranslator) {
	tracing::debug!(locale = ?translator.locale(), "default translator installed");
	*DEFAULT_TRANSLATOR.write() = Some(translator);
}

/// Returns the process-wide default translator, if one is installed
pub fn default_translator() -> Option<SharedTranslator> {
	DEFAULT_TRANSLATOR.read().clone()
}

/// Checks whether a process-wide default translator is installed
pub fn has_default_translator() -> bool {
	DEFAULT_TRANSLATOR.read().is_some()
}

/// Removes the process-wide default translator
///
/// This is primarily useful for testing.
pub fn clear_default_translator() {
	*DEFAULT_TRANSLATOR.write() = None;
}
