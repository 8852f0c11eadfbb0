//! Ordered data tables rendered through decorator chains
//!
//! A [`DataTable`] is a named set of [`Element`]s, one per grid column.
//! Elements keep their insertion order unless they carry an order hint;
//! the [`order`] engine resolves hints and insertion order into one
//! deterministic sequence. Tables and elements render through chains of
//! [`Decorator`](decorator::Decorator)s resolved lazily by short name
//! through a [`PluginLoader`](plugin::PluginLoader), and the built-in
//! decorators call the view helpers of a [`View`] to produce the table
//! markup and the script initialising the browser grid.
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[DataTable] --> B[Ordering]
//!     A --> C[Elements]
//!     A --> D[DecoratorChain]
//!     C --> E[FilterChain]
//!     C --> F[DecoratorChain]
//!     D --> G[DataTableElements]
//!     D --> H[DataTable frame]
//!     F --> I[ViewHelper]
//!     I --> J[Element helpers]
//!     H --> K[Table helper]
//!     K --> L[GridConfig]
//! ```
//!
//! # Example
//!
//! ```rust
//! use datatable_tables::{DataTable, HtmlView, RenderContext};
//!
//! let mut table = DataTable::new("users").unwrap();
//! table.set_ajax("/users/list");
//! table.add_new_element("hidden", "id", Default::default()).unwrap();
//! table.add_new_element("text", "nome", Default::default()).unwrap();
//! table.element_mut("nome").unwrap().set_label("Name");
//!
//! let view = HtmlView::new();
//! let html = table.render_to_string(&RenderContext::new().with_view(&view));
//!
//! assert!(html.contains("<th id=\"nome\" name=\"nome\" >Name</th>"));
//! assert!(html.contains("\"serverSide\":true"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod content;
pub mod context;
pub mod decorator;
pub mod element;
pub mod error;
pub mod filter;
pub mod grid;
pub mod name;
pub mod order;
pub mod plugin;
pub mod settings;
pub mod slot;
pub mod table;
pub mod values;
pub mod view;

// Re-exports for convenience
pub use column::ColumnOptions;
pub use content::Content;
pub use context::RenderContext;
pub use decorator::{Decorator, DecoratorChain, DecoratorSpec, Owner, OwnerKind};
pub use element::{ButtonConfig, Element, ElementKind};
pub use error::{TableError, TableResult};
pub use filter::{Filter, FilterSpec};
pub use order::Ordering;
pub use plugin::{PluginLoader, PluginRegistry, PluginType};
pub use settings::{ElementOptions, ElementSettings, TableSettings};
pub use table::{DataTable, ElementSpec, encode_json};
pub use view::{HtmlView, Route, View};
