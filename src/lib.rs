//! # Datatable
//!
//! Server-side builder for browser data grids.
//!
//! A table is declared as a set of named elements, ordered deterministically
//! and rendered through decorator chains into the table markup plus the
//! script that initialises the grid. Rows can be served through the
//! server-side response produced by [`encode_json`].
//!
//! ## Feature Flags
//!
//! - `i18n` (default) - re-exports the message catalogs used to translate
//!   labels under [`i18n`]
//!
//! ## Quick Example
//!
//! ```rust
//! use datatable::prelude::*;
//!
//! let settings = TableSettings::from_toml_str(r#"
//!     [datatable]
//!     name = "users"
//!     ajax = "/users/list"
//!     cache_pages = 5
//!
//!     [[datatable.elements]]
//!     type = "hidden"
//!     name = "id"
//!
//!     [[datatable.elements]]
//!     type = "text"
//!     name = "nome"
//!     label = "Name"
//! "#).unwrap();
//!
//! let mut table = DataTable::from_settings(settings).unwrap();
//! let view = HtmlView::new();
//! let html = table.render_to_string(&RenderContext::new().with_view(&view));
//!
//! assert!(html.contains("$.fn.dataTable.pipeline("));
//! ```

#![warn(missing_docs)]

pub use datatable_tables::*;

/// Label translation
#[cfg(feature = "i18n")]
pub mod i18n {
	pub use datatable_i18n::*;
}

/// Types needed to declare and render a table
pub mod prelude {
	pub use datatable_tables::{
		ButtonConfig, Content, DataTable, DecoratorSpec, Element, ElementKind, ElementOptions, FilterSpec,
		HtmlView, RenderContext, Route, TableError, TableResult, TableSettings, View, encode_json,
	};

	#[cfg(feature = "i18n")]
	pub use datatable_i18n::{MessageCatalog, SharedTranslator, Translator};
}
