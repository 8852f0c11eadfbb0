//! Plugin registry and prefix-based kind resolution
//!
//! Decorators, filters and element kinds are registered under fully
//! qualified names such as `DataTable_Decorator_ViewHelper`. Owners refer
//! to them by short kind (`ViewHelper`), which a [`PluginLoader`] expands by
//! trying its prefixes, most recently added first.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decorator::{Decorator, ElementsDecorator, FrameDecorator, ViewHelperDecorator};
use crate::element::{ButtonConfig, ElementKind};
use crate::error::{TableError, TableResult};
use crate::filter::{Filter, StringTrim, StripTags};
use crate::name::ucfirst;

/// Construction options of a decorator or filter
pub type Options = serde_json::Map<String, Value>;

/// Prefix of the built-in decorators
pub const DECORATOR_PREFIX: &str = "DataTable_Decorator_";
/// Prefix of the built-in element kinds
pub const ELEMENT_PREFIX: &str = "DataTable_Element_";
/// Prefix of the built-in filters
pub const FILTER_PREFIX: &str = "Filter_";

/// Kind of plugin being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
	/// Rendering strategies
	Decorator,
	/// Element kinds
	Element,
	/// Value filters
	Filter,
}

impl PluginType {
	/// Prefix searched when nothing else is configured
	pub fn default_prefix(self) -> &'static str {
		match self {
			Self::Decorator => DECORATOR_PREFIX,
			Self::Element => ELEMENT_PREFIX,
			Self::Filter => FILTER_PREFIX,
		}
	}
}

impl fmt::Display for PluginType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Decorator => "decorator",
			Self::Element => "element",
			Self::Filter => "filter",
		})
	}
}

type DecoratorFactory = Arc<dyn Fn(Options) -> Box<dyn Decorator> + Send + Sync>;
type FilterFactory = Arc<dyn Fn(Options) -> Box<dyn Filter> + Send + Sync>;
type ElementFactory = Arc<dyn Fn() -> ElementKind + Send + Sync>;

static BUILTIN: Lazy<Arc<PluginRegistry>> = Lazy::new(|| Arc::new(PluginRegistry::with_builtins()));

/// Factories keyed by qualified plugin name
#[derive(Clone, Default)]
pub struct PluginRegistry {
	decorators: HashMap<String, DecoratorFactory>,
	filters: HashMap<String, FilterFactory>,
	elements: HashMap<String, ElementFactory>,
}

impl PluginRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a registry holding the built-in decorators, filters and elements
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry
			.register_decorator("DataTable_Decorator_ViewHelper", |options| {
				Box::new(ViewHelperDecorator::new(options))
			})
			.register_decorator("DataTable_Decorator_DataTableElements", |options| {
				Box::new(ElementsDecorator::new(options))
			})
			.register_decorator("DataTable_Decorator_DataTable", |options| {
				Box::new(FrameDecorator::new(options))
			})
			.register_filter("Filter_StripTags", |options| Box::new(StripTags::new(&options)))
			.register_filter("Filter_StringTrim", |options| {
				Box::new(StringTrim::new(&options))
			})
			.register_element("DataTable_Element_Text", || ElementKind::Text)
			.register_element("DataTable_Element_Hidden", || ElementKind::Hidden)
			.register_element("DataTable_Element_Button", || {
				ElementKind::Button(ButtonConfig::default())
			});
		registry
	}

	/// Shared registry with the built-ins only
	pub fn builtin() -> Arc<Self> {
		Arc::clone(&BUILTIN)
	}

	/// Register a decorator factory under a qualified name
	pub fn register_decorator<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
	where
		F: Fn(Options) -> Box<dyn Decorator> + Send + Sync + 'static,
	{
		self.decorators.insert(name.into(), Arc::new(factory));
		self
	}

	/// Register a filter factory under a qualified name
	pub fn register_filter<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
	where
		F: Fn(Options) -> Box<dyn Filter> + Send + Sync + 'static,
	{
		self.filters.insert(name.into(), Arc::new(factory));
		self
	}

	/// Register an element kind under a qualified name
	pub fn register_element<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
	where
		F: Fn() -> ElementKind + Send + Sync + 'static,
	{
		self.elements.insert(name.into(), Arc::new(factory));
		self
	}

	/// Whether `name` is registered for `plugin_type`
	pub fn contains(&self, plugin_type: PluginType, name: &str) -> bool {
		match plugin_type {
			PluginType::Decorator => self.decorators.contains_key(name),
			PluginType::Element => self.elements.contains_key(name),
			PluginType::Filter => self.filters.contains_key(name),
		}
	}

	fn build_decorator(&self, name: &str, options: Options) -> Option<Box<dyn Decorator>> {
		self.decorators.get(name).map(|factory| factory(options))
	}

	fn build_filter(&self, name: &str, options: Options) -> Option<Box<dyn Filter>> {
		self.filters.get(name).map(|factory| factory(options))
	}

	fn build_element(&self, name: &str) -> Option<ElementKind> {
		self.elements.get(name).map(|factory| factory())
	}
}

impl fmt::Debug for PluginRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut decorators: Vec<_> = self.decorators.keys().collect();
		let mut filters: Vec<_> = self.filters.keys().collect();
		let mut elements: Vec<_> = self.elements.keys().collect();
		decorators.sort();
		filters.sort();
		elements.sort();
		f.debug_struct("PluginRegistry")
			.field("decorators", &decorators)
			.field("filters", &filters)
			.field("elements", &elements)
			.finish()
	}
}

/// Resolves short kind names against a registry through prefix lists
///
/// # Examples
///
/// ```
/// use datatable_tables::plugin::{PluginLoader, PluginType};
///
/// let loader = PluginLoader::builtin();
/// assert_eq!(
///     loader.load(PluginType::Decorator, "viewHelper").unwrap(),
///     "DataTable_Decorator_ViewHelper"
/// );
/// assert!(loader.load(PluginType::Element, "Select").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PluginLoader {
	registry: Arc<PluginRegistry>,
	prefixes: HashMap<PluginType, Vec<String>>,
}

impl PluginLoader {
	/// Loader over `registry` with the default prefix for every plugin type
	pub fn new(registry: Arc<PluginRegistry>) -> Self {
		let prefixes = [PluginType::Decorator, PluginType::Element, PluginType::Filter]
			.into_iter()
			.map(|ty| (ty, vec![ty.default_prefix().to_string()]))
			.collect();
		Self { registry, prefixes }
	}

	/// Loader over the shared built-in registry
	pub fn builtin() -> Self {
		Self::new(PluginRegistry::builtin())
	}

	/// Registry consulted by this loader
	pub fn registry(&self) -> &Arc<PluginRegistry> {
		&self.registry
	}

	/// Add a prefix; a known prefix moves to the front of the search
	pub fn add_prefix_path(&mut self, plugin_type: PluginType, prefix: impl Into<String>) -> &mut Self {
		let prefix = prefix.into();
		let list = self.prefixes.entry(plugin_type).or_default();
		list.retain(|p| *p != prefix);
		list.push(prefix);
		self
	}

	/// Add several prefixes in order
	pub fn add_prefix_paths<I, S>(&mut self, plugin_type: PluginType, prefixes: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for prefix in prefixes {
			self.add_prefix_path(plugin_type, prefix);
		}
		self
	}

	/// Prefixes for `plugin_type`, oldest first
	pub fn prefixes(&self, plugin_type: PluginType) -> &[String] {
		self.prefixes
			.get(&plugin_type)
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	/// Qualified name `name` resolves to
	pub fn load(&self, plugin_type: PluginType, name: &str) -> TableResult<String> {
		if self.registry.contains(plugin_type, name) {
			return Ok(name.to_string());
		}

		let short = ucfirst(name);
		let prefixes = self.prefixes(plugin_type);
		prefixes
			.iter()
			.rev()
			.map(|prefix| format!("{prefix}{short}"))
			.find(|candidate| self.registry.contains(plugin_type, candidate))
			.ok_or_else(|| TableError::PluginResolution {
				name: name.to_string(),
				plugin_type,
				prefixes: prefixes.iter().rev().cloned().collect(),
			})
	}

	/// Instantiate the decorator `kind` resolves to
	pub fn load_decorator(&self, kind: &str, options: &Options) -> TableResult<Box<dyn Decorator>> {
		let qualified = self.load(PluginType::Decorator, kind)?;
		self.registry
			.build_decorator(&qualified, options.clone())
			.ok_or_else(|| self.missing(PluginType::Decorator, kind))
	}

	/// Instantiate the filter `kind` resolves to
	pub fn load_filter(&self, kind: &str, options: &Options) -> TableResult<Box<dyn Filter>> {
		let qualified = self.load(PluginType::Filter, kind)?;
		self.registry
			.build_filter(&qualified, options.clone())
			.ok_or_else(|| self.missing(PluginType::Filter, kind))
	}

	/// Element kind `kind` resolves to
	pub fn load_element(&self, kind: &str) -> TableResult<ElementKind> {
		let qualified = self.load(PluginType::Element, kind)?;
		self.registry
			.build_element(&qualified)
			.ok_or_else(|| self.missing(PluginType::Element, kind))
	}

	fn missing(&self, plugin_type: PluginType, name: &str) -> TableError {
		TableError::PluginResolution {
			name: name.to_string(),
			plugin_type,
			prefixes: self.prefixes(plugin_type).iter().rev().cloned().collect(),
		}
	}
}

impl Default for PluginLoader {
	fn default() -> Self {
		Self::builtin()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(PluginType::Decorator, "ViewHelper", "DataTable_Decorator_ViewHelper")]
	#[case(PluginType::Decorator, "dataTableElements", "DataTable_Decorator_DataTableElements")]
	#[case(PluginType::Decorator, "DataTable_Decorator_DataTable", "DataTable_Decorator_DataTable")]
	#[case(PluginType::Element, "text", "DataTable_Element_Text")]
	#[case(PluginType::Element, "Button", "DataTable_Element_Button")]
	#[case(PluginType::Filter, "StringTrim", "Filter_StringTrim")]
	fn test_builtin_resolution(
		#[case] plugin_type: PluginType,
		#[case] name: &str,
		#[case] expected: &str,
	) {
		let loader = PluginLoader::builtin();
		assert_eq!(loader.load(plugin_type, name).unwrap(), expected);
	}

	#[rstest]
	fn test_unknown_kind_lists_prefixes() {
		let mut loader = PluginLoader::builtin();
		loader.add_prefix_path(PluginType::Element, "App_Element_");

		let err = loader.load(PluginType::Element, "Select").unwrap_err();
		match err {
			TableError::PluginResolution {
				name,
				plugin_type,
				prefixes,
			} => {
				assert_eq!(name, "Select");
				assert_eq!(plugin_type, PluginType::Element);
				assert_eq!(prefixes, ["App_Element_", "DataTable_Element_"]);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_latest_prefix_wins() {
		let mut registry = PluginRegistry::with_builtins();
		registry.register_element("App_Element_Text", || ElementKind::Custom {
			type_name: "App_Element_Text".to_string(),
			helper: None,
		});
		let mut loader = PluginLoader::new(Arc::new(registry));
		loader.add_prefix_path(PluginType::Element, "App_Element_");

		assert_eq!(loader.load(PluginType::Element, "Text").unwrap(), "App_Element_Text");
		assert!(matches!(
			loader.load_element("Text").unwrap(),
			ElementKind::Custom { .. }
		));
	}

	#[rstest]
	fn test_re_adding_prefix_moves_it_last() {
		let mut loader = PluginLoader::builtin();
		loader
			.add_prefix_paths(PluginType::Filter, ["A_", "B_"])
			.add_prefix_path(PluginType::Filter, "A_");
		assert_eq!(loader.prefixes(PluginType::Filter), ["Filter_", "B_", "A_"]);
	}

	#[rstest]
	fn test_builtin_instances() {
		let loader = PluginLoader::builtin();
		let decorator = loader.load_decorator("ViewHelper", &Options::new()).unwrap();
		assert_eq!(decorator.kind_name(), "DataTable_Decorator_ViewHelper");
		let filter = loader.load_filter("StripTags", &Options::new()).unwrap();
		assert_eq!(filter.kind_name(), "Filter_StripTags");
		assert!(matches!(loader.load_element("Hidden").unwrap(), ElementKind::Hidden));
	}

	#[rstest]
	fn test_plugin_type_display() {
		assert_eq!(PluginType::Decorator.to_string(), "decorator");
		assert_eq!(PluginType::Filter.to_string(), "filter");
	}
}
