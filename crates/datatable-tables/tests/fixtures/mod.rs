//! Common test fixtures for datatable-tables tests

#![allow(dead_code)]

use datatable_tables::content::Content;
use datatable_tables::context::RenderContext;
use datatable_tables::decorator::{Decorator, Owner};
use datatable_tables::element::{ButtonConfig, Element};
use datatable_tables::error::TableResult;
use datatable_tables::plugin::{Options, PluginRegistry};
use datatable_tables::settings::ElementOptions;
use datatable_tables::table::DataTable;
use datatable_tables::view::{HtmlView, Route};
use rstest::*;
use std::sync::Arc;

/// View with the built-in helpers under `/app`
#[fixture]
pub fn view() -> HtmlView {
	HtmlView::new().with_base_url("/app")
}

/// Table with a text, a description and an edit button column
#[fixture]
pub fn users_table() -> DataTable {
	let mut table = DataTable::new("users").unwrap();
	table
		.add_new_element(
			"text",
			"nome",
			ElementOptions {
				label: Some("Name".to_string()),
				..ElementOptions::default()
			},
		)
		.unwrap()
		.add_new_element(
			"text",
			"desc",
			ElementOptions {
				label: Some("Description".to_string()),
				..ElementOptions::default()
			},
		)
		.unwrap()
		.add_new_element("button", "btn", ElementOptions::default())
		.unwrap();

	let button = table.element_mut("btn").unwrap();
	button.set_label("Edit").set_value(serde_json::json!("Edit"));
	if let Some(config) = button.button_mut() {
		*config = ButtonConfig::default()
			.with_params(["nome"])
			.with_url(Route::new("users", "edit"))
			.with_modal("Open?");
	}
	table
}

/// Decorator wrapping the incoming markup in a marker
#[derive(Debug, Clone, Default)]
pub struct Wrap {
	options: Options,
}

impl Wrap {
	pub fn new(options: Options) -> Self {
		Self { options }
	}
}

impl Decorator for Wrap {
	fn kind_name(&self) -> &str {
		"App_Decorator_Wrap"
	}

	fn options(&self) -> &Options {
		&self.options
	}

	fn options_mut(&mut self) -> &mut Options {
		&mut self.options
	}

	fn render(&mut self, owner: Owner<'_>, _ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		let tag = self
			.options
			.get("tag")
			.and_then(serde_json::Value::as_str)
			.unwrap_or("wrap")
			.to_string();
		let mut content = content;
		content.markup = format!("<{tag} owner=\"{}\">{}</{tag}>", owner.name(), content.markup);
		Ok(content)
	}

	fn clone_box(&self) -> Box<dyn Decorator> {
		Box::new(self.clone())
	}
}

/// Built-ins plus `App_Decorator_Wrap`
#[fixture]
pub fn app_registry() -> Arc<PluginRegistry> {
	let mut registry = PluginRegistry::with_builtins();
	registry.register_decorator("App_Decorator_Wrap", |options| Box::new(Wrap::new(options)));
	Arc::new(registry)
}
