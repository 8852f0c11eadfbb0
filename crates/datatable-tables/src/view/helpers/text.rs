use serde_json::Value;

use super::{ElementHelper, header_cell, put_default};
use crate::content::Content;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::TableResult;
use crate::view::View;

/// Visible data column
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHelper;

impl ElementHelper for TextHelper {
	fn render(&self, element: &Element, view: &dyn View, ctx: &RenderContext<'_>) -> TableResult<Content> {
		let attribs = view.html_attribs(element.attribs());
		let markup = header_cell(element, view, ctx, &attribs);

		let id = view.escape(&element.id());
		let mut column = element.column_options().to_params();
		put_default(&mut column, "name", Value::String(id.clone()));
		put_default(&mut column, "data", Value::String(id));

		Ok(Content {
			markup,
			columns: vec![column],
			scripts: Vec::new(),
		})
	}
}
