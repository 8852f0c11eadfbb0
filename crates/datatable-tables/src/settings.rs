//! Declarative table and element settings
//!
//! Settings are plain serde structs, usually read from TOML. A document may
//! hold the table under a `[datatable]` table or at its root:
//!
//! ```toml
//! [datatable]
//! name = "users"
//! ajax = "/users/list"
//! cache_pages = 5
//!
//! [datatable.attribs]
//! class = "compact"
//!
//! [[datatable.elements]]
//! type = "text"
//! name = "nome"
//! label = "Nome"
//! column = { width = "40%" }
//!
//! [[datatable.elements]]
//! type = "button"
//! name = "edit"
//! params = ["id"]
//! url = { controller = "users", action = "edit" }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::column::ColumnOptions;
use crate::decorator::DecoratorSpec;
use crate::error::TableResult;
use crate::filter::FilterSpec;
use crate::plugin::PluginType;
use crate::view::Route;

/// Key of the section holding the table settings
pub const SECTION: &str = "datatable";

/// A plugin prefix to register
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefixPath {
	/// Plugin type the prefix applies to
	#[serde(rename = "type")]
	pub plugin_type: PluginType,
	/// Prefix prepended to short kind names
	pub prefix: String,
}

/// Options of a single element
///
/// Keys that match no field are kept as free attributes and go through the
/// same reserved-name check as [`Element::set_attrib`](crate::element::Element::set_attrib).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementOptions {
	/// Header label
	pub label: Option<String>,
	/// Description
	pub description: Option<String>,
	/// Initial value
	pub value: Option<Value>,
	/// Order hint
	pub order: Option<i32>,
	/// Leave out of the aggregate values
	pub ignore: Option<bool>,
	/// Holds a list
	pub is_array: Option<bool>,
	/// View helper override
	pub helper: Option<String>,
	/// Explicit id
	pub id: Option<String>,
	/// Grid column options
	pub column: Option<ColumnOptions>,
	/// Button URL parameters
	pub params: Vec<String>,
	/// Button target route
	pub url: Option<Route>,
	/// Button confirmation message
	pub modal: Option<String>,
	/// Decorators replacing the defaults
	pub decorators: Option<Vec<DecoratorSpec>>,
	/// Filters replacing the configured ones
	pub filters: Option<Vec<FilterSpec>>,
	/// Skip the default decorators
	pub disable_load_default_decorators: Option<bool>,
	/// Turn translation off
	pub disable_translator: Option<bool>,
	/// Extra plugin prefixes
	pub prefix_paths: Vec<PrefixPath>,
	/// Free attributes
	#[serde(flatten)]
	pub attribs: IndexMap<String, Value>,
}

/// An element entry of a table document
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSettings {
	/// Short or qualified element kind
	#[serde(rename = "type")]
	pub kind: String,
	/// Element name
	pub name: String,
	/// Remaining options
	#[serde(flatten)]
	pub options: ElementOptions,
}

/// Options of a whole table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Table name
	pub name: Option<String>,
	/// HTML attributes, also merged into the grid options
	pub attribs: IndexMap<String, Value>,
	/// Form method
	pub method: Option<String>,
	/// Server-side data endpoint
	pub ajax: Option<String>,
	/// Pages to cache through the pipeline, `0` disables it
	pub cache_pages: u32,
	/// Render a footer with per-column select filters
	pub tfoot: bool,
	/// Nest values under the table name
	pub is_array: bool,
	/// Order hint
	pub order: Option<i32>,
	/// Skip the default decorators
	pub disable_load_default_decorators: bool,
	/// Turn translation off
	pub disable_translator: bool,
	/// Decorators replacing the defaults
	pub decorators: Option<Vec<DecoratorSpec>>,
	/// Decorators given to every element created afterwards
	pub element_decorators: Option<Vec<DecoratorSpec>>,
	/// Plugin prefixes of the table
	pub prefix_paths: Vec<PrefixPath>,
	/// Plugin prefixes handed to elements
	pub element_prefix_paths: Vec<PrefixPath>,
	/// Elements in insertion order
	pub elements: Vec<ElementSettings>,
}

impl TableSettings {
	/// Parse a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use datatable_tables::settings::TableSettings;
	///
	/// let settings = TableSettings::from_toml_str(r#"
	///     [datatable]
	///     name = "users"
	///     tfoot = true
	/// "#).unwrap();
	/// assert_eq!(settings.name.as_deref(), Some("users"));
	/// assert!(settings.tfoot);
	/// ```
	pub fn from_toml_str(source: &str) -> TableResult<Self> {
		let document: toml::Value = toml::from_str(source)?;
		let section = match document.get(SECTION) {
			Some(section) => section.clone(),
			None => document,
		};
		Ok(section.try_into()?)
	}

	/// Read and parse a TOML file
	pub fn from_path(path: impl AsRef<Path>) -> TableResult<Self> {
		let source = fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}
}
