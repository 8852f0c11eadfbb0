use serde_json::Value;

use super::{ElementHelper, header_cell, put_default};
use crate::content::Content;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::TableResult;
use crate::view::View;

/// Column holding data the grid needs but never shows
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenHelper;

impl ElementHelper for HiddenHelper {
	fn render(&self, element: &Element, view: &dyn View, ctx: &RenderContext<'_>) -> TableResult<Content> {
		let id = view.escape(&element.id());
		let mut column = element.column_options().to_params();
		put_default(&mut column, "name", Value::String(id.clone()));
		put_default(&mut column, "data", Value::String(id));
		put_default(&mut column, "visible", Value::Bool(false));
		put_default(&mut column, "searchable", Value::Bool(false));

		Ok(Content {
			markup: header_cell(element, view, ctx, ""),
			columns: vec![column],
			scripts: Vec::new(),
		})
	}
}
