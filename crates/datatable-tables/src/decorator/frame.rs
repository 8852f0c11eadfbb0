use indexmap::IndexMap;
use serde_json::{Value, json};

use super::{Decorator, Owner, OwnerKind};
use crate::content::Content;
use crate::context::RenderContext;
use crate::error::{TableError, TableResult};
use crate::plugin::Options;

const DEFAULT_HELPER: &str = "DataTable";

/// Wraps the rendered elements into the table frame
///
/// Without a view the content is returned unchanged. Otherwise the table
/// helper (`helper` option, default `DataTable`) receives the decorator
/// options merged with the table attributes, the table winning, plus the
/// table's id and data source settings.
#[derive(Debug, Clone, Default)]
pub struct FrameDecorator {
	options: Options,
}

impl FrameDecorator {
	/// Qualified kind name
	pub const KIND: &'static str = "DataTable_Decorator_DataTable";

	/// Create from options
	pub fn new(options: Options) -> Self {
		Self { options }
	}
}

impl Decorator for FrameDecorator {
	fn kind_name(&self) -> &str {
		Self::KIND
	}

	fn options(&self) -> &Options {
		&self.options
	}

	fn options_mut(&mut self) -> &mut Options {
		&mut self.options
	}

	fn accepts(&self, owner: OwnerKind) -> bool {
		owner == OwnerKind::Table
	}

	fn render(&mut self, owner: Owner<'_>, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		let table = match owner {
			Owner::Table(table) => table,
			other => {
				return Err(TableError::Binding {
					decorator: Self::KIND.to_string(),
					owner: other.describe(),
				});
			}
		};
		let Some(view) = ctx.view() else {
			tracing::debug!(table = %table.name(), "no view bound, frame left out");
			return Ok(content);
		};

		let helper_name = self
			.options
			.get("helper")
			.and_then(Value::as_str)
			.unwrap_or(DEFAULT_HELPER)
			.to_string();

		let mut attribs: IndexMap<String, Value> = self
			.options
			.iter()
			.filter(|(key, _)| key.as_str() != "helper")
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect();
		for (key, value) in table.attribs() {
			attribs.insert(key.clone(), value.clone());
		}
		attribs.insert("id".to_string(), Value::String(table.id()));
		if let Some(ajax) = table.ajax() {
			attribs.insert("ajax".to_string(), Value::String(ajax.to_string()));
		}
		if let Some(method) = table.explicit_method() {
			attribs.insert("method".to_string(), Value::String(method.to_string()));
		}
		if table.cache_pages() > 0 {
			attribs.insert("cache".to_string(), json!({ "pages": table.cache_pages() }));
		}
		if table.tfoot() {
			attribs.insert("tfoot".to_string(), Value::Bool(true));
		}

		let helper = view
			.table_helper(&helper_name)
			.ok_or_else(|| TableError::UnknownHelper(helper_name.clone()))?;
		helper.render(view, &table.fully_qualified_name(), attribs, content)
	}

	fn clone_box(&self) -> Box<dyn Decorator> {
		Box::new(self.clone())
	}
}
