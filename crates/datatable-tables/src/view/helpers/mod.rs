//! Built-in markup helpers
//!
//! Element helpers turn one element into a header cell, its column
//! definition and an optional script. The table helper wraps the cells into
//! the outer `<table>` and writes the grid initialisation script. Form
//! helpers wrap form fields and bind them to a grid.

mod button;
mod frame;
mod hidden;
mod search_form;
mod text;

pub use button::ButtonHelper;
pub use frame::FrameHelper;
pub use hidden::HiddenHelper;
pub use search_form::{DEFAULT_SEARCH_BUTTON, SearchFormHelper};
pub use text::TextHelper;

use indexmap::IndexMap;
use serde_json::Value;

use crate::column::ColumnParams;
use crate::content::Content;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::TableResult;
use crate::view::View;

/// Renders a single element
pub trait ElementHelper: Send + Sync {
	/// Header cell, column definition and scripts for `element`
	fn render(&self, element: &Element, view: &dyn View, ctx: &RenderContext<'_>) -> TableResult<Content>;
}

/// Renders the frame around the element cells
pub trait TableHelper: Send + Sync {
	/// Wrap `content` into the table markup
	///
	/// `attribs` carries the HTML attributes together with the control keys
	/// `id`, `ajax`, `method`, `cache` and `tfoot`.
	fn render(
		&self,
		view: &dyn View,
		name: &str,
		attribs: IndexMap<String, Value>,
		content: Content,
	) -> TableResult<Content>;
}

/// Renders a form driving a grid
pub trait FormHelper: Send + Sync {
	/// Wrap the form fields in `content` into a form bound to the grid
	/// rendered under `table_id`
	fn render(
		&self,
		view: &dyn View,
		name: &str,
		attribs: IndexMap<String, Value>,
		content: Content,
		table_id: &str,
	) -> TableResult<Content>;
}

/// `<th>` cell shared by the element helpers
pub(crate) fn header_cell(element: &Element, view: &dyn View, ctx: &RenderContext<'_>, extra: &str) -> String {
	let label = element.translated_label(ctx).unwrap_or_default();
	format!(
		"<th id=\"{}\"{} name=\"{}\" >{}</th>",
		view.escape(&element.id()),
		extra,
		view.escape(&element.fully_qualified_name()),
		view.escape(&label),
	)
}

/// Insert `key` unless the column options already set it
pub(crate) fn put_default(params: &mut ColumnParams, key: &str, value: Value) {
	params.entry(key).or_insert(value);
}

/// Text form of an element value
pub(crate) fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
