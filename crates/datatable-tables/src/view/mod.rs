//! Display surface consumed by decorators
//!
//! A [`View`] escapes text, builds URLs and hands out the named helpers that
//! turn an element or a table into [`Content`](crate::content::Content).
//! [`HtmlView`] is the default implementation and registers the built-in
//! helpers.

pub mod escape;
pub mod helpers;

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use self::escape::{attribute_text, escape_html};
use self::helpers::{
	ButtonHelper, ElementHelper, FormHelper, FrameHelper, HiddenHelper, SearchFormHelper, TableHelper, TextHelper,
};

/// Route segments and parameters a URL is assembled from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
	/// Module segment
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	/// Controller segment
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub controller: Option<String>,
	/// Action segment
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	/// Trailing `key/value` pairs
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub params: IndexMap<String, String>,
}

impl Route {
	/// Route to `controller/action`
	pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			controller: Some(controller.into()),
			action: Some(action.into()),
			..Self::default()
		}
	}

	/// Set the module segment
	pub fn with_module(mut self, module: impl Into<String>) -> Self {
		self.module = Some(module.into());
		self
	}

	/// Append a `key/value` parameter
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Path segments in URL order
	pub fn segments(&self) -> Vec<&str> {
		let mut segments: Vec<&str> = [&self.module, &self.controller, &self.action]
			.into_iter()
			.filter_map(|s| s.as_deref())
			.collect();
		for (key, value) in &self.params {
			segments.push(key);
			segments.push(value);
		}
		segments
	}
}

/// Escaping, URL building and helper lookup
pub trait View: Debug + Send + Sync {
	/// Escape text for HTML output
	fn escape(&self, value: &str) -> String {
		escape_html(value)
	}

	/// Base URL of the application, without a trailing slash
	fn base_url(&self) -> &str;

	/// URL for `route`
	fn url(&self, route: &Route) -> String {
		let mut url = self.base_url().trim_end_matches('/').to_string();
		for segment in route.segments() {
			url.push('/');
			url.push_str(segment);
		}
		if url.is_empty() {
			url.push('/');
		}
		url
	}

	/// Helper rendering a single element
	fn element_helper(&self, name: &str) -> Option<&dyn ElementHelper>;

	/// Helper rendering the table frame
	fn table_helper(&self, name: &str) -> Option<&dyn TableHelper>;

	/// Helper rendering a form bound to a grid
	fn form_helper(&self, _name: &str) -> Option<&dyn FormHelper> {
		None
	}

	/// ` key="value"` pairs for `attribs`, escaped
	fn html_attribs(&self, attribs: &IndexMap<String, Value>) -> String {
		attribs
			.iter()
			.filter_map(|(key, value)| {
				attribute_text(value).map(|text| format!(" {}=\"{}\"", self.escape(key), self.escape(&text)))
			})
			.collect()
	}
}

/// Default view with a case-insensitive helper registry
///
/// # Examples
///
/// ```
/// use datatable_tables::view::{HtmlView, Route, View};
///
/// let view = HtmlView::new().with_base_url("/app");
/// let route = Route::new("users", "edit").with_param("id", "7");
/// assert_eq!(view.url(&route), "/app/users/edit/id/7");
/// assert!(view.element_helper("datatableText").is_some());
/// assert!(view.table_helper("DataTable").is_some());
/// assert!(view.form_helper("FormDataTable").is_some());
/// ```
#[derive(Clone)]
pub struct HtmlView {
	base_url: String,
	element_helpers: HashMap<String, Arc<dyn ElementHelper>>,
	table_helpers: HashMap<String, Arc<dyn TableHelper>>,
	form_helpers: HashMap<String, Arc<dyn FormHelper>>,
}

impl HtmlView {
	/// View with the built-in helpers and an empty base URL
	pub fn new() -> Self {
		let mut view = Self {
			base_url: String::new(),
			element_helpers: HashMap::new(),
			table_helpers: HashMap::new(),
			form_helpers: HashMap::new(),
		};
		view.register_element_helper("DataTableText", TextHelper)
			.register_element_helper("DataTableHidden", HiddenHelper)
			.register_element_helper("DataTableButton", ButtonHelper)
			.register_table_helper("DataTable", FrameHelper)
			.register_form_helper("FormDataTable", SearchFormHelper);
		view
	}

	/// Set the base URL
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	/// Register or replace an element helper
	pub fn register_element_helper<H>(&mut self, name: &str, helper: H) -> &mut Self
	where
		H: ElementHelper + 'static,
	{
		self.element_helpers.insert(name.to_lowercase(), Arc::new(helper));
		self
	}

	/// Register or replace a table helper
	pub fn register_table_helper<H>(&mut self, name: &str, helper: H) -> &mut Self
	where
		H: TableHelper + 'static,
	{
		self.table_helpers.insert(name.to_lowercase(), Arc::new(helper));
		self
	}

	/// Register or replace a form helper
	pub fn register_form_helper<H>(&mut self, name: &str, helper: H) -> &mut Self
	where
		H: FormHelper + 'static,
	{
		self.form_helpers.insert(name.to_lowercase(), Arc::new(helper));
		self
	}
}

impl Default for HtmlView {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for HtmlView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut element_helpers: Vec<_> = self.element_helpers.keys().collect();
		let mut table_helpers: Vec<_> = self.table_helpers.keys().collect();
		let mut form_helpers: Vec<_> = self.form_helpers.keys().collect();
		element_helpers.sort();
		table_helpers.sort();
		form_helpers.sort();
		f.debug_struct("HtmlView")
			.field("base_url", &self.base_url)
			.field("element_helpers", &element_helpers)
			.field("table_helpers", &table_helpers)
			.field("form_helpers", &form_helpers)
			.finish()
	}
}

impl View for HtmlView {
	fn base_url(&self) -> &str {
		&self.base_url
	}

	fn element_helper(&self, name: &str) -> Option<&dyn ElementHelper> {
		self.element_helpers
			.get(&name.to_lowercase())
			.map(|helper| helper.as_ref())
	}

	fn table_helper(&self, name: &str) -> Option<&dyn TableHelper> {
		self.table_helpers
			.get(&name.to_lowercase())
			.map(|helper| helper.as_ref())
	}

	fn form_helper(&self, name: &str) -> Option<&dyn FormHelper> {
		self.form_helpers
			.get(&name.to_lowercase())
			.map(|helper| helper.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(Route::default(), "/")]
	#[case(Route::new("index", "list"), "/index/list")]
	#[case(Route::new("a", "b").with_module("admin").with_param("k", "v"), "/admin/a/b/k/v")]
	fn test_url(#[case] route: Route, #[case] expected: &str) {
		assert_eq!(HtmlView::new().url(&route), expected);
	}

	#[rstest]
	fn test_url_with_base() {
		let view = HtmlView::new().with_base_url("https://example.com/app/");
		assert_eq!(view.url(&Route::new("x", "y")), "https://example.com/app/x/y");
	}

	#[rstest]
	fn test_helper_lookup_ignores_case() {
		let view = HtmlView::new();
		assert!(view.element_helper("DATATABLEHIDDEN").is_some());
		assert!(view.element_helper("datatableSelect").is_none());
		assert!(view.table_helper("datatable").is_some());
		assert!(view.form_helper("formdatatable").is_some());
	}

	#[rstest]
	fn test_html_attribs() {
		let view = HtmlView::new();
		let mut attribs = IndexMap::new();
		attribs.insert("class".to_string(), json!(["a", "b"]));
		attribs.insert("title".to_string(), json!("x\"y"));
		attribs.insert("hidden".to_string(), json!(null));
		assert_eq!(view.html_attribs(&attribs), " class=\"a b\" title=\"x&quot;y\"");
	}
}
