//! Translation support for data table labels
//!
//! Labels of data table elements are passed through a [`Translator`] before
//! they reach the markup. This crate provides the trait, a locale bound
//! [`MessageCatalog`] implementing it, a gettext `.po` loader and the
//! process-wide default translator slot.
//!
//! # Example
//!
//! ```rust
//! use datatable_i18n::{MessageCatalog, Translator};
//!
//! let mut catalog = MessageCatalog::new("pt_BR");
//! catalog.add_translation("Name", "Nome");
//!
//! assert_eq!(catalog.translate("Name"), "Nome");
//! assert_eq!(catalog.translate("Unknown"), "Unknown");
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod po_parser;
pub mod translator;

pub use catalog::{MessageCatalog, PluralRule};
pub use po_parser::{PoParseError, parse_po_reader, parse_po_str};
pub use translator::{
	NullTranslator, SharedTranslator, Translator, clear_default_translator, default_translator,
	has_default_translator, set_default_translator,
};
