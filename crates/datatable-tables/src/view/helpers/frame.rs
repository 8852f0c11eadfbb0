use indexmap::IndexMap;
use serde_json::Value;

use super::TableHelper;
use crate::content::Content;
use crate::error::TableResult;
use crate::grid::{DEFAULT_AJAX_METHOD, DataSource, GridConfig};
use crate::name::id_from_name;
use crate::view::View;
use crate::view::escape::js_identifier;

/// Builds one select filter per footer cell from the column's distinct values
const FOOTER_FILTERS: &str = concat!(
	"\"initComplete\" : function () {",
	"this.api().columns().every( function () {",
	"var column = this;",
	"if($(column.footer()).text()==\"\"){ return; }",
	"var select = $('<select><option value=\"\"></option></select>')",
	".appendTo( $(column.footer()).empty() )",
	".on( 'change', function () {",
	"var val = $.fn.dataTable.util.escapeRegex(",
	"$(this).val()",
	");",
	"column.search( val ? '^'+val+'$' : '', true, false ).draw();",
	"} );",
	"column.data().unique().sort().each( function ( d, j ) {",
	"if(typeof(d)!=\"object\"){",
	"select.append( '<option value=\"'+d+'\">'+d+'</option>' )",
	"}",
	"} );",
	"} );",
	"}"
);

/// Outer `<table>` and grid initialisation
///
/// Control keys are taken out of the attributes before the rest is written
/// both as HTML attributes and into the grid options. The grid object is
/// kept in a script variable named after the table id. Element scripts get
/// `{main}` replaced by the table id and `{main_var}` by that variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameHelper;

struct Controls {
	id: String,
	source: Option<DataSource>,
	tfoot: bool,
}

impl FrameHelper {
	fn controls(name: &str, attribs: &mut IndexMap<String, Value>) -> Controls {
		let id = match attribs.shift_remove("id") {
			Some(Value::String(id)) if !id.is_empty() => id,
			_ => id_from_name(name),
		};
		attribs.shift_remove("name");
		attribs.shift_remove("escape");

		let url = match attribs.shift_remove("ajax") {
			Some(Value::String(url)) if !url.is_empty() => Some(url),
			_ => None,
		};
		let method = match attribs.shift_remove("method") {
			Some(Value::String(method)) if !method.is_empty() => method.to_uppercase(),
			_ => DEFAULT_AJAX_METHOD.to_string(),
		};
		let cache_pages = attribs
			.shift_remove("cache")
			.and_then(|cache| cache.get("pages").and_then(Value::as_u64))
			.and_then(|pages| u32::try_from(pages).ok())
			.unwrap_or(0);
		let tfoot = matches!(attribs.shift_remove("tfoot"), Some(Value::Bool(true)));

		Controls {
			id,
			source: url.map(|url| DataSource {
				url,
				method,
				cache_pages,
			}),
			tfoot,
		}
	}

	fn init_script(id: &str, config: &GridConfig, source: Option<&DataSource>, tfoot: bool) -> TableResult<String> {
		let json = config.to_json()?;
		let inner = json
			.strip_prefix('{')
			.and_then(|s| s.strip_suffix('}'))
			.unwrap_or(&json);
		let footer = if tfoot {
			format!(",{FOOTER_FILTERS}")
		} else {
			String::new()
		};

		let options = match source.and_then(DataSource::pipeline) {
			Some(pipeline) => format!(
				"{{{inner},\"ajax\" : $.fn.dataTable.pipeline({}){footer}}}",
				serde_json::to_string(&pipeline)?
			),
			None => format!("{{{inner}{footer}}}"),
		};
		Ok(format!(
			"var {} = $(\"table#{id}\").dataTable({options});",
			js_identifier(id)
		))
	}
}

impl TableHelper for FrameHelper {
	fn render(
		&self,
		view: &dyn View,
		name: &str,
		attribs: IndexMap<String, Value>,
		content: Content,
	) -> TableResult<Content> {
		let mut attribs = attribs;
		let controls = Self::controls(name, &mut attribs);

		let cells = &content.markup;
		let name_attr = if name.is_empty() {
			String::new()
		} else {
			format!(" name=\"{}\"", view.escape(name))
		};
		let tfoot = if controls.tfoot {
			format!("<tfoot><tr role=\"row\">{cells}</tr></tfoot>")
		} else {
			String::new()
		};
		let markup = format!(
			"<table cellpadding=\"0\" cellspacing=\"0\" border=\"0\" id=\"{}\"{}{}><thead><tr role=\"row\">{}</tr></thead>{}</table>",
			view.escape(&controls.id),
			name_attr,
			view.html_attribs(&attribs),
			cells,
			tfoot,
		);

		let config = GridConfig::new(attribs, controls.source.as_ref(), content.columns.clone());
		let mut scripts = vec![Self::init_script(
			&controls.id,
			&config,
			controls.source.as_ref(),
			controls.tfoot,
		)?];
		let variable = js_identifier(&controls.id);
		scripts.extend(content.scripts.iter().map(|script| {
			script
				.replace("{main_var}", &variable)
				.replace("{main}", &controls.id)
		}));

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
	use crate::column::ColumnParams;
	use crate::view::HtmlView;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn cells() -> Content {
		let mut column = ColumnParams::new();
		column.insert("name".into(), json!("nome"));
		column.insert("data".into(), json!("nome"));
		Content {
			markup: "<th id=\"nome\" name=\"nome\" >Nome</th>".to_string(),
			columns: vec![column],
			scripts: vec!["go('#{main}', {main_var});".to_string()],
		}
	}

	fn attribs(pairs: Value) -> IndexMap<String, Value> {
		match pairs {
			Value::Object(map) => map.into_iter().collect(),
			_ => IndexMap::new(),
		}
	}

	#[rstest]
	fn test_plain_frame(cells: Content) {
		let view = HtmlView::new();
		let content = FrameHelper
			.render(&view, "users", attribs(json!({"id": "users", "class": "table"})), cells)
			.unwrap();

		assert_eq!(
			content.markup,
			"<table cellpadding=\"0\" cellspacing=\"0\" border=\"0\" id=\"users\" name=\"users\" class=\"table\"><thead><tr role=\"row\"><th id=\"nome\" name=\"nome\" >Nome</th></tr></thead></table>"
		);
		assert_eq!(
			content.scripts[0],
			r#"var users = $("table#users").dataTable({"columnDefs":[],"ordering":false,"class":"table","columns":[{"name":"nome","data":"nome"}]});"#
		);
		assert_eq!(content.scripts[1], "go('#users', users);");
		assert_eq!(content.columns.len(), 1);
	}

	#[rstest]
	fn test_ajax_frame(cells: Content) {
		let view = HtmlView::new();
		let content = FrameHelper
			.render(
				&view,
				"users",
				attribs(json!({"id": "grid", "ajax": "/users/list", "method": "post"})),
				cells,
			)
			.unwrap();

		assert!(content.markup.contains("id=\"grid\""));
		assert!(!content.markup.contains("ajax="));
		assert!(content.scripts[0].starts_with("var grid = $(\"table#grid\").dataTable({"));
		assert!(content.scripts[0].contains(
			r#""processing":true,"serverSide":true,"ajax":{"url":"/users/list","type":"POST"}"#
		));
	}

	#[rstest]
	fn test_ajax_method_defaults_to_get(cells: Content) {
		let content = FrameHelper
			.render(&HtmlView::new(), "t", attribs(json!({"ajax": "/rows"})), cells)
			.unwrap();
		assert!(content.scripts[0].contains(r#""ajax":{"url":"/rows","type":"GET"}"#));
	}

	#[rstest]
	fn test_cached_frame_uses_pipeline(cells: Content) {
		let content = FrameHelper
			.render(
				&HtmlView::new(),
				"t",
				attribs(json!({"ajax": "/rows", "cache": {"pages": 5}, "tfoot": true})),
				cells,
			)
			.unwrap();

		let script = &content.scripts[0];
		assert!(script.contains(
			r#","ajax" : $.fn.dataTable.pipeline({"pages":5,"url":"/rows","method":"GET"}),"initComplete" : function () {"#
		));
		assert!(!script.contains(r#""ajax":{"#));
		assert!(script.ends_with("});"));
		assert!(content.markup.contains("<tfoot><tr role=\"row\"><th id=\"nome\""));
	}

	#[rstest]
	fn test_id_derived_from_name(cells: Content) {
		let content = FrameHelper
			.render(&HtmlView::new(), "grid[users]", IndexMap::new(), cells)
			.unwrap();
		assert!(content.markup.contains("id=\"grid-users\" name=\"grid[users]\""));
		assert!(content.scripts[0].starts_with("var grid_users = $(\"table#grid-users\").dataTable({"));
		assert_eq!(content.scripts[1], "go('#grid-users', grid_users);");
	}
}
