//! Per-column options forwarded to the client grid

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column definition handed to the grid widget, one per element
pub type ColumnParams = serde_json::Map<String, Value>;

/// Grid options an element carries for its column
///
/// `class` is emitted as the grid's `className`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOptions {
	/// Column width, e.g. `10%`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<String>,
	/// CSS class of the column cells
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class: Option<String>,
	/// Grid data type (`string`, `num`, `date`, ...)
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
}

impl ColumnOptions {
	/// Set the column width
	pub fn with_width(mut self, width: impl Into<String>) -> Self {
		self.width = Some(width.into());
		self
	}

	/// Set the cell class
	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Set the grid data type
	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());
		self
	}

	/// Whether no option is set
	pub fn is_empty(&self) -> bool {
		self.width.is_none() && self.class.is_none() && self.kind.is_none()
	}

	/// Options in grid vocabulary
	///
	/// # Examples
	///
	/// ```
	/// use datatable_tables::column::ColumnOptions;
	/// use serde_json::json;
	///
	/// let params = ColumnOptions::default().with_width("10%").with_class("text-right").to_params();
	/// assert_eq!(serde_json::Value::Object(params), json!({"width": "10%", "className": "text-right"}));
	/// ```
	pub fn to_params(&self) -> ColumnParams {
		let mut params = ColumnParams::new();
		if let Some(width) = &self.width {
			params.insert("width".into(), Value::String(width.clone()));
		}
		if let Some(class) = &self.class {
			params.insert("className".into(), Value::String(class.clone()));
		}
		if let Some(kind) = &self.kind {
			params.insert("type".into(), Value::String(kind.clone()));
		}
		params
	}
}
