use serde_json::Value;

use super::{ElementHelper, header_cell, put_default, value_text};
use crate::content::Content;
use crate::context::RenderContext;
use crate::element::{ButtonConfig, Element, ElementKind};
use crate::error::TableResult;
use crate::view::{Route, View};

const DEFAULT_WIDTH: &str = "5%";
const DEFAULT_BUTTON_CLASS: &str = "btn-primary";

/// Action column with one button per row
///
/// The header cell carries the target URL and an optional confirmation
/// message. Clicking a button navigates to the URL extended with
/// `/<column>/<value>` for every column named in the button parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonHelper;

impl ElementHelper for ButtonHelper {
	fn render(&self, element: &Element, view: &dyn View, ctx: &RenderContext<'_>) -> TableResult<Content> {
		let default_config = ButtonConfig::default();
		let config = match element.kind() {
			ElementKind::Button(config) => config,
			_ => &default_config,
		};

		let url = view.url(config.url.as_ref().unwrap_or(&Route::default()));
		let mut extra = format!(" url=\"{}\"", view.escape(&url));
		if let Some(modal) = &config.modal {
			extra.push_str(&format!(" modal=\"{}\"", view.escape(modal)));
		}

		let id = view.escape(&element.id());
		let options = element.column_options();
		let button_class = options.class.as_deref().unwrap_or(DEFAULT_BUTTON_CLASS);

		let mut column = options.to_params();
		column.shift_remove("className");
		put_default(&mut column, "width", Value::String(DEFAULT_WIDTH.to_string()));
		put_default(&mut column, "name", Value::String(id.clone()));
		put_default(&mut column, "searchable", Value::Bool(false));
		put_default(&mut column, "className", Value::String("col-button".to_string()));
		put_default(&mut column, "data", Value::Null);
		put_default(
			&mut column,
			"defaultContent",
			Value::String(format!(
				"<span class=\"btn {} {}\">{}</span>",
				id,
				view.escape(button_class),
				view.escape(&value_text(element.value())),
			)),
		);

		let scripts = if config.params.is_empty() {
			Vec::new()
		} else {
			vec![click_script(&id, &config.params)?]
		};

		Ok(Content {
			markup: header_cell(element, view, ctx, &extra),
			columns: vec![column],
			scripts,
		})
	}
}

fn click_script(id: &str, params: &[String]) -> TableResult<String> {
	let columns = serde_json::to_string(params)?;
	Ok(format!(
		concat!(
			"$('#{{main}} tbody').on( 'click', 'td.col-button > span.{id}', function () {{",
			"var table = {{main_var}}.DataTable();",
			"var _cell =  $(this).parent();",
			"var rowIdx = table.cell(_cell ).index().row;",
			"var columns={columns};",
			"var columnIdx=[];",
			"var header = table.column($(_cell).index()).header();",
			"var $header = $(header);",
			"var url = $header.attr('url');",
			"$.each(columns, function(k,v){{",
			"columnIdx.push(table.column( v+':name' ).index());",
			"}});",
			"var columnDataHeader = table.columns(columnIdx).header();",
			"var columnData = table.cells( rowIdx,columnIdx).data();",
			"for (i = 0; i < columnDataHeader.length; i++) {{",
			"id = $(columnDataHeader[i]).attr('id');",
			"url += '/'+id+'/'+columnData[i];",
			"}}",
			"if($header.attr('modal')){{",
			"bootbox.confirm($header.attr('modal'), function(result) {{",
			"if(result){{",
			"window.location.href =  url;",
			"}}",
			"}});",
			"}}else{{",
			" window.location.href = url;",
			"}}",
			"}} );"
		),
		id = id,
		columns = columns,
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::ColumnOptions;
	use crate::view::HtmlView;
	use serde_json::json;

	fn button(config: ButtonConfig) -> Element {
		let mut element = Element::new(ElementKind::Button(config), "edit").unwrap();
		element.set_label("Editar").set_value(json!("Edit"));
		element
	}

	#[test]
	fn test_button_cell_and_column() {
		let config = ButtonConfig::default()
			.with_url(Route::new("users", "edit"))
			.with_modal("Sure?");
		let element = button(config);
		let view = HtmlView::new().with_base_url("/app");

		let content = ButtonHelper.render(&element, &view, &RenderContext::new()).unwrap();

		assert_eq!(
			content.markup,
			"<th id=\"edit\" url=\"/app/users/edit\" modal=\"Sure?\" name=\"edit\" >Editar</th>"
		);
		assert_eq!(
			Value::Object(content.columns[0].clone()),
			json!({
				"width": "5%",
				"name": "edit",
				"searchable": false,
				"className": "col-button",
				"data": null,
				"defaultContent": "<span class=\"btn edit btn-primary\">Edit</span>"
			})
		);
		assert!(content.scripts.is_empty());
	}

	#[test]
	fn test_button_class_and_width_from_options() {
		let mut element = button(ButtonConfig::default());
		element.set_column_options(ColumnOptions::default().with_width("8%").with_class("btn-danger"));

		let content = ButtonHelper
			.render(&element, &HtmlView::new(), &RenderContext::new())
			.unwrap();
		let column = &content.columns[0];

		assert_eq!(column["width"], json!("8%"));
		assert_eq!(column["className"], json!("col-button"));
		assert_eq!(
			column["defaultContent"],
			json!("<span class=\"btn edit btn-danger\">Edit</span>")
		);
	}

	#[test]
	fn test_params_emit_click_script() {
		let element = button(ButtonConfig::default().with_params(["id", "nome"]));

		let content = ButtonHelper
			.render(&element, &HtmlView::new(), &RenderContext::new())
			.unwrap();

		assert_eq!(content.scripts.len(), 1);
		let script = &content.scripts[0];
		assert!(script.starts_with("$('#{main} tbody').on( 'click', 'td.col-button > span.edit'"));
		assert!(script.contains("var table = {main_var}.DataTable();"));
		assert!(script.contains("var columns=[\"id\",\"nome\"];"));
		assert!(script.ends_with("} );"));
	}
}
