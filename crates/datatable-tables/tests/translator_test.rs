mod fixtures;

use datatable_i18n::{MessageCatalog, clear_default_translator, set_default_translator};
use datatable_tables::context::RenderContext;
use datatable_tables::table::DataTable;
use datatable_tables::view::HtmlView;
use fixtures::{users_table, view};
use rstest::*;
use serial_test::serial;
use std::sync::Arc;

fn portuguese() -> MessageCatalog {
	let mut catalog = MessageCatalog::new("pt_BR");
	catalog.add_translation("Name", "Nome");
	catalog.add_translation("Edit", "Editar");
	catalog
}

#[rstest]
#[serial(default_translator)]
fn test_global_translator_is_used(mut users_table: DataTable, view: HtmlView) {
	set_default_translator(Arc::new(portuguese()));

	let ctx = RenderContext::new().with_view(&view).with_global_translator();
	let html = users_table.render_to_string(&ctx);
	clear_default_translator();

	assert!(html.contains(">Nome</th>"));
	assert!(html.contains(">Editar</th>"));
	assert!(html.contains(">Description</th>"));
}

#[rstest]
#[serial(default_translator)]
fn test_disabled_translators(mut users_table: DataTable, view: HtmlView) {
	set_default_translator(Arc::new(portuguese()));
	users_table.set_disable_translator(true);
	users_table.element_mut("btn").unwrap().set_disable_translator(true);

	let ctx = RenderContext::new().with_view(&view).with_global_translator();
	let html = users_table.render_to_string(&ctx);
	clear_default_translator();

	// elements still fall back to the global translator on their own
	assert!(html.contains(">Nome</th>"));
	assert!(html.contains(">Edit</th>"));
	assert!(!users_table.element("nome").unwrap().has_translator());
}

#[rstest]
fn test_own_translator_wins_over_table(mut users_table: DataTable, view: HtmlView) {
	let mut element_catalog = MessageCatalog::new("es");
	element_catalog.add_translation("Name", "Nombre");
	users_table
		.element_mut("nome")
		.unwrap()
		.set_translator(Some(Arc::new(element_catalog)));
	users_table.set_translator(Some(Arc::new(portuguese())));

	let html = users_table.render_to_string(&RenderContext::new().with_view(&view));

	assert!(html.contains(">Nombre</th>"));
	assert!(html.contains(">Editar</th>"));
}
