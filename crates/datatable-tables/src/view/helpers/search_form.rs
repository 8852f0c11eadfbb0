use indexmap::IndexMap;
use serde_json::Value;

use super::FormHelper;
use crate::content::Content;
use crate::error::TableResult;
use crate::name::id_from_name;
use crate::view::View;

/// Id of the button that submits the search when none is given
pub const DEFAULT_SEARCH_BUTTON: &str = "btPesquisar";

/// Search form bound to a grid
///
/// Clicking the search button copies every text input of the form into the
/// search of the grid column sharing the input's name, then redraws the grid
/// once the form validates. The button id is read from the `button` control
/// key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchFormHelper;

impl SearchFormHelper {
	fn script(button: &str, table_id: &str, form_id: &str) -> String {
		format!(
			concat!(
				"$('button#{button}').click( function(){{",
				"var table = $('table[id={table}]').DataTable();",
				"var form = $('form[id={form}]');",
				"form.find('input[type=text]').each(function(k,v){{",
				"var columnIdx=null;",
				"var name = $(v).attr('name');",
				"columnIdx= table.column( name+':name' ).index();",
				"table.column(columnIdx).search($(v).val());",
				"}});",
				"if(form.validate().valid()){{",
				"table.draw();",
				"}}",
				"}});"
			),
			button = button,
			table = table_id,
			form = form_id,
		)
	}
}

impl FormHelper for SearchFormHelper {
	fn render(
		&self,
		view: &dyn View,
		name: &str,
		attribs: IndexMap<String, Value>,
		content: Content,
		table_id: &str,
	) -> TableResult<Content> {
		let mut attribs = attribs;
		let form_id = match attribs.shift_remove("id") {
			Some(Value::String(id)) if !id.is_empty() => id,
			_ => id_from_name(name),
		};
		let button = match attribs.shift_remove("button") {
			Some(Value::String(button)) if !button.is_empty() => button,
			_ => DEFAULT_SEARCH_BUTTON.to_string(),
		};
		attribs.shift_remove("name");

		let name_attr = if name.is_empty() {
			String::new()
		} else {
			format!(" name=\"{}\"", view.escape(name))
		};
		let markup = format!(
			"<form id=\"{}\"{}{}>{}</form>",
			view.escape(&form_id),
			name_attr,
			view.html_attribs(&attribs),
			content.markup,
		);

		let mut scripts = content.scripts;
		scripts.push(Self::script(&button, table_id, &form_id));

		Ok(Content {
			markup,
			columns: content.columns,
			scripts,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::view::HtmlView;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_form_wraps_fields_and_binds_search() {
		let mut attribs = IndexMap::new();
		attribs.insert("id".to_string(), json!("filters"));
		attribs.insert("method".to_string(), json!("get"));

		let content = SearchFormHelper
			.render(
				&HtmlView::new(),
				"filters",
				attribs,
				Content::from_markup("<input type=\"text\" name=\"nome\">"),
				"users",
			)
			.unwrap();

		assert_eq!(
			content.markup,
			"<form id=\"filters\" name=\"filters\" method=\"get\"><input type=\"text\" name=\"nome\"></form>"
		);
		assert_eq!(content.scripts.len(), 1);
		let script = &content.scripts[0];
		assert!(script.starts_with("$('button#btPesquisar').click( function(){"));
		assert!(script.contains("var table = $('table[id=users]').DataTable();"));
		assert!(script.contains("var form = $('form[id=filters]');"));
		assert!(script.contains("table.column(columnIdx).search($(v).val());"));
		assert!(script.ends_with("if(form.validate().valid()){table.draw();}});"));
	}

	#[rstest]
	fn test_button_and_id_from_controls() {
		let mut attribs = IndexMap::new();
		attribs.insert("button".to_string(), json!("go"));

		let content = SearchFormHelper
			.render(&HtmlView::new(), "search[users]", attribs, Content::new(), "grid")
			.unwrap();

		assert_eq!(
			content.markup,
			"<form id=\"search-users\" name=\"search[users]\"></form>"
		);
		assert!(content.scripts[0].starts_with("$('button#go').click("));
		assert!(content.scripts[0].contains("$('form[id=search-users]')"));
	}
}
