//! The data table aggregate
//!
//! A [`DataTable`] owns its elements keyed by name, the [`Ordering`] that
//! sequences them, its own decorator chain and the settings of the browser
//! grid: data endpoint, page cache, footer filters. Rendering runs the
//! table chain, which by default renders every element
//! (`DataTableElements`) and wraps the result in the table frame
//! (`DataTable`).
//!
//! # Examples
//!
//! ```
//! use datatable_tables::context::RenderContext;
//! use datatable_tables::table::DataTable;
//! use datatable_tables::view::HtmlView;
//!
//! let mut table = DataTable::new("users").unwrap();
//! table.add_new_element("text", "nome", Default::default()).unwrap();
//! table.add_new_element("hidden", "id", Default::default()).unwrap();
//!
//! let view = HtmlView::new();
//! let html = table.render(&RenderContext::new().with_view(&view)).unwrap().to_html();
//!
//! assert!(html.starts_with("<table"));
//! assert!(html.contains("$(\"table#users\").dataTable("));
//! ```

use std::sync::Arc;

use datatable_i18n::SharedTranslator;
use indexmap::IndexMap;
use serde_json::Value;

use crate::content::Content;
use crate::context::RenderContext;
use crate::decorator::{Decorator, DecoratorChain, DecoratorSpec, ElementsDecorator, Owner};
use crate::element::{Element, check_attribute};
use crate::error::{TableError, TableResult};
use crate::filter::FilterSpec;
use crate::grid::ServerResponse;
use crate::name::{id_from_name, validate_name};
use crate::order::Ordering;
use crate::plugin::{PluginLoader, PluginRegistry, PluginType};
use crate::settings::{ElementOptions, ElementSettings, PrefixPath, TableSettings};
use crate::values::{attach_to_array, merge_recursive};

/// CSS class given to tables that have none
pub const DEFAULT_CLASS: &str = "datatable table table-striped table-bordered";

/// Accepted form methods
pub const METHODS: &[&str] = &["delete", "get", "post", "put"];

/// Form method reported when none is set
pub const DEFAULT_METHOD: &str = "post";

/// Names held by typed fields of the table
pub const RESERVED_ATTRIBUTES: &[&str] = &[
	"name",
	"method",
	"ajax",
	"cache",
	"cache_pages",
	"tfoot",
	"order",
	"is_array",
	"isArray",
	"translator",
	"decorators",
	"elements",
];

/// An element to add, built or described
#[derive(Debug, Clone)]
pub enum ElementSpec {
	/// Ready element
	Instance(Element),
	/// Element the table creates with its own defaults
	Kind {
		/// Short or qualified element kind
		kind: String,
		/// Element name
		name: String,
		/// Options applied on creation
		options: ElementOptions,
	},
}

impl ElementSpec {
	/// Element of `kind` named `name`
	pub fn kind(kind: impl Into<String>, name: impl Into<String>) -> Self {
		Self::Kind {
			kind: kind.into(),
			name: name.into(),
			options: ElementOptions::default(),
		}
	}

	/// Parse an element entry
	///
	/// `key` is the map key the entry was found under, if any. Accepted
	/// shapes are a kind string under a name key, `[kind, name, options]`
	/// and `{type, name?, options?}`.
	pub fn from_value(key: Option<&str>, value: &Value) -> TableResult<Self> {
		match value {
			Value::String(kind) => {
				let name = key.ok_or_else(|| {
					TableError::InvalidSpec("Elements specified by string must have an accompanying name".to_string())
				})?;
				Ok(Self::kind(kind.as_str(), name))
			}
			Value::Array(items) => {
				let kind = items.first().and_then(Value::as_str);
				let name = items.get(1).and_then(Value::as_str).or(key);
				match (kind, name) {
					(Some(kind), Some(name)) => Ok(Self::Kind {
						kind: kind.to_string(),
						name: name.to_string(),
						options: options_from(items.get(2))?,
					}),
					_ => Err(invalid_element(value)),
				}
			}
			Value::Object(map) => {
				let kind = map.get("type").and_then(Value::as_str);
				let name = map.get("name").and_then(Value::as_str).or(key);
				match (kind, name) {
					(Some(kind), Some(name)) => Ok(Self::Kind {
						kind: kind.to_string(),
						name: name.to_string(),
						options: options_from(map.get("options"))?,
					}),
					_ => Err(invalid_element(value)),
				}
			}
			_ => Err(invalid_element(value)),
		}
	}
}

impl From<Element> for ElementSpec {
	fn from(element: Element) -> Self {
		Self::Instance(element)
	}
}

impl From<ElementSettings> for ElementSpec {
	fn from(settings: ElementSettings) -> Self {
		Self::Kind {
			kind: settings.kind,
			name: settings.name,
			options: settings.options,
		}
	}
}

fn options_from(value: Option<&Value>) -> TableResult<ElementOptions> {
	match value {
		None | Some(Value::Null) => Ok(ElementOptions::default()),
		Some(value) => serde_json::from_value(value.clone()).map_err(|error| {
			TableError::InvalidSpec(format!("invalid element options {value}: {error}"))
		}),
	}
}

fn invalid_element(value: &Value) -> TableError {
	TableError::InvalidSpec(format!(
		"Element must be specified by string or element instance, got {value}"
	))
}

/// Data table
#[derive(Debug, Clone)]
pub struct DataTable {
	name: String,
	attribs: IndexMap<String, Value>,
	order: Option<i32>,
	is_array: bool,
	method: Option<String>,
	ajax: Option<String>,
	cache_pages: u32,
	tfoot: bool,
	elements: IndexMap<String, Element>,
	ordering: Ordering,
	decorators: DecoratorChain,
	element_decorators: Option<Vec<DecoratorSpec>>,
	loader: PluginLoader,
	element_loader: PluginLoader,
	translator: Option<SharedTranslator>,
	disable_translator: bool,
	disable_load_default_decorators: bool,
	rendered: bool,
}

impl DataTable {
	/// Table resolving plugins through the built-in registry
	pub fn new(name: &str) -> TableResult<Self> {
		Self::with_registry(name, PluginRegistry::builtin())
	}

	/// Table resolving plugins through `registry`
	pub fn with_registry(name: &str, registry: Arc<PluginRegistry>) -> TableResult<Self> {
		let mut table = Self::bare(name, registry)?;
		table.load_default_decorators()?;
		Ok(table)
	}

	/// Table built from settings
	///
	/// # Examples
	///
	/// ```
	/// use datatable_tables::settings::TableSettings;
	/// use datatable_tables::table::DataTable;
	///
	/// let settings = TableSettings::from_toml_str(r#"
	///     name = "users"
	///     ajax = "/users/list"
	///
	///     [[elements]]
	///     type = "text"
	///     name = "nome"
	///     label = "Nome"
	/// "#).unwrap();
	/// let table = DataTable::from_settings(settings).unwrap();
	///
	/// assert_eq!(table.ajax(), Some("/users/list"));
	/// assert_eq!(table.element("nome").unwrap().label(), Some("Nome"));
	/// ```
	pub fn from_settings(settings: TableSettings) -> TableResult<Self> {
		Self::from_settings_with(settings, PluginRegistry::builtin())
	}

	/// Table built from settings, resolving plugins through `registry`
	pub fn from_settings_with(settings: TableSettings, registry: Arc<PluginRegistry>) -> TableResult<Self> {
		let TableSettings {
			name,
			attribs,
			method,
			ajax,
			cache_pages,
			tfoot,
			is_array,
			order,
			disable_load_default_decorators,
			disable_translator,
			decorators,
			element_decorators,
			prefix_paths,
			element_prefix_paths,
			elements,
		} = settings;

		let name = name.ok_or_else(|| TableError::NameValidation("a table needs a name".to_string()))?;
		let mut table = Self::bare(&name, registry)?;
		for PrefixPath { plugin_type, prefix } in prefix_paths {
			table.add_prefix_path(plugin_type, prefix);
		}
		for PrefixPath { plugin_type, prefix } in element_prefix_paths {
			table.add_element_prefix_path(plugin_type, prefix);
		}
		table.add_attribs(attribs)?;
		if let Some(method) = method {
			table.set_method(&method)?;
		}
		if let Some(ajax) = ajax {
			table.set_ajax(ajax);
		}
		table
			.set_cache_pages(cache_pages)
			.set_tfoot(tfoot)
			.set_is_array(is_array)
			.set_order(order)
			.set_disable_translator(disable_translator)
			.set_disable_load_default_decorators(disable_load_default_decorators);
		table.element_decorators = element_decorators;
		if let Some(decorators) = decorators {
			table.set_decorators(decorators)?;
		}
		table.add_elements(elements.into_iter().map(ElementSpec::from))?;
		table.load_default_decorators()?;
		Ok(table)
	}

	fn bare(name: &str, registry: Arc<PluginRegistry>) -> TableResult<Self> {
		let loader = PluginLoader::new(registry);
		Ok(Self {
			name: validate_name(name)?,
			attribs: IndexMap::new(),
			order: None,
			is_array: false,
			method: None,
			ajax: None,
			cache_pages: 0,
			tfoot: false,
			elements: IndexMap::new(),
			ordering: Ordering::new(),
			decorators: DecoratorChain::new(),
			element_decorators: None,
			element_loader: loader.clone(),
			loader,
			translator: None,
			disable_translator: false,
			disable_load_default_decorators: false,
			rendered: false,
		})
	}

	/// Validated name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Rename the table
	pub fn set_name(&mut self, name: &str) -> TableResult<&mut Self> {
		self.name = validate_name(name)?;
		Ok(self)
	}

	/// Name with `[]` appended when values nest under the table
	pub fn fully_qualified_name(&self) -> String {
		if self.is_array {
			format!("{}[]", self.name)
		} else {
			self.name.clone()
		}
	}

	/// `id` attribute when set, else derived from the fully qualified name
	pub fn id(&self) -> String {
		match self.attribs.get("id").and_then(Value::as_str) {
			Some(id) if !id.is_empty() => id.to_string(),
			_ => id_from_name(&self.fully_qualified_name()),
		}
	}

	/// Order hint
	pub fn order(&self) -> Option<i32> {
		self.order
	}

	/// Set the order hint
	pub fn set_order(&mut self, order: Option<i32>) -> &mut Self {
		self.order = order;
		self
	}

	/// Whether values nest under the table name
	pub fn is_array(&self) -> bool {
		self.is_array
	}

	/// Nest values under the table name
	pub fn set_is_array(&mut self, flag: bool) -> &mut Self {
		self.is_array = flag;
		self
	}

	/// Set the form method; one of `delete`, `get`, `post`, `put`
	pub fn set_method(&mut self, method: &str) -> TableResult<&mut Self> {
		let method = method.to_lowercase();
		if !METHODS.contains(&method.as_str()) {
			return Err(TableError::InvalidMethod(method));
		}
		self.method = Some(method);
		Ok(self)
	}

	/// Form method, `post` unless set
	pub fn method(&self) -> &str {
		self.method.as_deref().unwrap_or(DEFAULT_METHOD)
	}

	/// Form method when one was set
	pub fn explicit_method(&self) -> Option<&str> {
		self.method.as_deref()
	}

	/// Load rows from `url` on the server
	pub fn set_ajax(&mut self, url: impl Into<String>) -> &mut Self {
		self.ajax = Some(url.into());
		self
	}

	/// Server-side data endpoint
	pub fn ajax(&self) -> Option<&str> {
		self.ajax.as_deref()
	}

	/// Pages to cache on the client, `0` turns caching off
	pub fn set_cache_pages(&mut self, pages: u32) -> &mut Self {
		self.cache_pages = pages;
		self
	}

	/// Pages cached on the client
	pub fn cache_pages(&self) -> u32 {
		self.cache_pages
	}

	/// Render a footer with per-column select filters
	pub fn set_tfoot(&mut self, flag: bool) -> &mut Self {
		self.tfoot = flag;
		self
	}

	/// Whether a filter footer is rendered
	pub fn tfoot(&self) -> bool {
		self.tfoot
	}

	/// Set an HTML attribute
	pub fn set_attrib(&mut self, name: &str, value: Value) -> TableResult<&mut Self> {
		check_attribute(name, RESERVED_ATTRIBUTES)?;
		self.attribs.insert(name.to_string(), value);
		Ok(self)
	}

	/// Set several attributes
	pub fn add_attribs<I>(&mut self, attribs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		for (name, value) in attribs {
			self.set_attrib(&name, value)?;
		}
		Ok(self)
	}

	/// Replace every attribute
	pub fn set_attribs<I>(&mut self, attribs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		self.attribs.clear();
		self.add_attribs(attribs)
	}

	/// Single attribute
	pub fn attrib(&self, name: &str) -> Option<&Value> {
		self.attribs.get(name)
	}

	/// Every attribute in insertion order
	pub fn attribs(&self) -> &IndexMap<String, Value> {
		&self.attribs
	}

	/// Remove an attribute, returning it
	pub fn remove_attrib(&mut self, name: &str) -> Option<Value> {
		self.attribs.shift_remove(name)
	}

	/// Remove every attribute
	pub fn clear_attribs(&mut self) -> &mut Self {
		self.attribs.clear();
		self
	}

	/// Set or unset the table translator
	pub fn set_translator(&mut self, translator: Option<SharedTranslator>) -> &mut Self {
		self.translator = translator;
		self
	}

	/// Whether the table has a translator of its own
	pub fn has_translator(&self) -> bool {
		self.translator.is_some()
	}

	/// Effective translator: own, else the context default, unless disabled
	pub fn translator(&self, ctx: &RenderContext<'_>) -> Option<SharedTranslator> {
		if self.disable_translator {
			return None;
		}
		self.translator
			.clone()
			.or_else(|| ctx.default_translator().cloned())
	}

	/// Turn translation off or back on
	pub fn set_disable_translator(&mut self, flag: bool) -> &mut Self {
		self.disable_translator = flag;
		self
	}

	/// Whether translation is off
	pub fn translator_is_disabled(&self) -> bool {
		self.disable_translator
	}

	/// Plugin loader of the table decorators
	pub fn loader(&self) -> &PluginLoader {
		&self.loader
	}

	/// Add a plugin prefix for the table itself
	pub fn add_prefix_path(&mut self, plugin_type: PluginType, prefix: impl Into<String>) -> &mut Self {
		self.loader.add_prefix_path(plugin_type, prefix);
		self
	}

	/// Add a plugin prefix for current and future elements
	pub fn add_element_prefix_path(&mut self, plugin_type: PluginType, prefix: impl Into<String>) -> &mut Self {
		let prefix = prefix.into();
		for element in self.elements.values_mut() {
			element.add_prefix_path(plugin_type, prefix.clone());
		}
		self.element_loader.add_prefix_path(plugin_type, prefix);
		self
	}

	/// Build an element with the table's element defaults, without adding it
	///
	/// The element gets the table's element prefixes, its decorator
	/// prefixes, and the element decorators unless `options` names some.
	pub fn create_element(&self, kind: &str, name: &str, options: ElementOptions) -> TableResult<Element> {
		let element_kind = self.element_loader.load_element(kind)?;
		let mut loader = self.element_loader.clone();
		loader.add_prefix_paths(PluginType::Decorator, custom_prefixes(&self.loader, PluginType::Decorator));

		let mut options = options;
		if options.decorators.is_none() {
			options.decorators = self.element_decorators.clone();
		}
		Element::build(element_kind, name, loader, options)
	}

	/// Add a built element under its name
	///
	/// An element already registered under that name is replaced in place.
	pub fn add_element(&mut self, element: Element) -> &mut Self {
		let mut element = element;
		for plugin_type in [PluginType::Decorator, PluginType::Element, PluginType::Filter] {
			for prefix in custom_prefixes(&self.element_loader, plugin_type) {
				element.add_prefix_path(plugin_type, prefix);
			}
		}
		let name = element.name().to_string();
		self.ordering.insert(name.clone(), element.order());
		self.elements.insert(name, element);
		self
	}

	/// Create an element and add it
	pub fn add_new_element(&mut self, kind: &str, name: &str, options: ElementOptions) -> TableResult<&mut Self> {
		let element = self.create_element(kind, name, options)?;
		Ok(self.add_element(element))
	}

	/// Add several elements in order
	pub fn add_elements<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = ElementSpec>,
	{
		for spec in specs {
			match spec {
				ElementSpec::Instance(element) => {
					self.add_element(element);
				}
				ElementSpec::Kind { kind, name, options } => {
					self.add_new_element(&kind, &name, options)?;
				}
			}
		}
		Ok(self)
	}

	/// Add elements described by a JSON list or name-keyed map
	pub fn add_elements_from_value(&mut self, value: &Value) -> TableResult<&mut Self> {
		let specs = match value {
			Value::Array(items) => items
				.iter()
				.map(|item| ElementSpec::from_value(None, item))
				.collect::<TableResult<Vec<_>>>()?,
			Value::Object(map) => map
				.iter()
				.map(|(key, item)| ElementSpec::from_value(Some(key), item))
				.collect::<TableResult<Vec<_>>>()?,
			other => return Err(invalid_element(other)),
		};
		self.add_elements(specs)
	}

	/// Replace every element
	pub fn set_elements<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = ElementSpec>,
	{
		self.clear_elements();
		self.add_elements(specs)
	}

	/// Element registered under `name`
	pub fn element(&self, name: &str) -> Option<&Element> {
		self.elements.get(name)
	}

	/// Mutable element registered under `name`
	///
	/// An order assigned through it is picked up by the next resolution only
	/// when the element was added without one; an order recorded at insertion
	/// keeps its position.
	pub fn element_mut(&mut self, name: &str) -> Option<&mut Element> {
		let element = self.elements.get_mut(name)?;
		self.ordering.touch();
		Some(element)
	}

	/// Every element in insertion order
	pub fn elements(&self) -> impl Iterator<Item = &Element> {
		self.elements.values()
	}

	/// Element names in insertion order
	pub fn element_names(&self) -> Vec<String> {
		self.elements.keys().cloned().collect()
	}

	/// Remove an element; returns whether it existed
	pub fn remove_element(&mut self, name: &str) -> bool {
		let removed = self.elements.shift_remove(name).is_some();
		if removed {
			self.ordering.remove(name);
		}
		removed
	}

	/// Remove every element
	pub fn clear_elements(&mut self) -> &mut Self {
		self.elements.clear();
		self.ordering.clear();
		self
	}

	/// Keep an element but leave it out of iteration and rendering
	pub fn remove_from_iteration(&mut self, name: &str) -> bool {
		self.ordering.remove(name)
	}

	/// Element names in resolved order
	///
	/// Elements added without an order hint honour one assigned later;
	/// elements added with one keep the recorded position.
	pub fn ordered_names(&mut self) -> TableResult<Vec<String>> {
		let elements = &self.elements;
		let names = self
			.ordering
			.resolve_with(|name| elements.get(name).and_then(Element::order))?;
		Ok(names.to_vec())
	}

	/// Elements in resolved order
	pub fn iter(&mut self) -> TableResult<Vec<&Element>> {
		let names = self.ordered_names()?;
		names
			.iter()
			.map(|name| {
				self.elements
					.get(name)
					.ok_or_else(|| TableError::CorruptIterator(name.clone()))
			})
			.collect()
	}

	/// Number of iterated elements
	pub fn count(&self) -> usize {
		self.ordering.len()
	}

	/// Filtered value of one element
	pub fn value(&mut self, name: &str) -> TableResult<Option<Value>> {
		match self.elements.get_mut(name) {
			Some(element) => element.filtered_value().map(Some),
			None => Ok(None),
		}
	}

	/// Stored value of one element
	pub fn unfiltered_value(&self, name: &str) -> Option<&Value> {
		self.elements.get(name).map(Element::unfiltered_value)
	}

	/// Filtered values of every element not ignored, as one nested map
	///
	/// Element names in array notation nest their value. When the table is
	/// an array and has not been rendered yet, the result nests under the
	/// table name unless `suppress_array_notation` is set.
	///
	/// # Examples
	///
	/// ```
	/// use datatable_tables::table::DataTable;
	/// use serde_json::json;
	///
	/// let mut table = DataTable::new("grid").unwrap();
	/// table.add_new_element("text", "nome", Default::default()).unwrap();
	/// table.add_new_element("hidden", "id", Default::default()).unwrap();
	/// table.element_mut("nome").unwrap().set_value(json!(" Ana "));
	/// table.element_mut("id").unwrap().set_value(json!(7)).set_ignore(true);
	///
	/// assert_eq!(table.values(false).unwrap(), json!({"nome": "Ana"}));
	/// ```
	pub fn values(&mut self, suppress_array_notation: bool) -> TableResult<Value> {
		let mut values = Value::Object(serde_json::Map::new());
		for (name, element) in self.elements.iter_mut() {
			if element.ignore() {
				continue;
			}
			let value = element.filtered_value()?;
			merge_recursive(&mut values, attach_to_array(value, name));
		}
		if !suppress_array_notation && self.is_array && !self.rendered {
			values = attach_to_array(values, &self.name);
		}
		Ok(values)
	}

	/// Stored values of every element keyed by name
	pub fn unfiltered_values(&self) -> IndexMap<String, Value> {
		self.elements
			.iter()
			.map(|(name, element)| (name.clone(), element.unfiltered_value().clone()))
			.collect()
	}

	/// Replace the filters of every element
	pub fn set_element_filters<I>(&mut self, specs: I) -> &mut Self
	where
		I: IntoIterator<Item = FilterSpec>,
	{
		let specs: Vec<FilterSpec> = specs.into_iter().collect();
		for element in self.elements.values_mut() {
			element.set_filters(specs.clone());
		}
		self
	}

	/// Replace the decorators of elements
	///
	/// With `subset`, only the named elements are touched when `include` is
	/// set, every other element otherwise. The decorators also become the
	/// default of elements created afterwards.
	pub fn set_element_decorators(
		&mut self,
		decorators: Vec<DecoratorSpec>,
		subset: Option<&[&str]>,
		include: bool,
	) -> TableResult<&mut Self> {
		for (name, element) in self.elements.iter_mut() {
			let selected = match subset {
				Some(names) => names.contains(&name.as_str()) == include,
				None => true,
			};
			if selected {
				element.set_decorators(decorators.clone())?;
			}
		}
		self.element_decorators = Some(decorators);
		Ok(self)
	}

	/// Decorators given to elements created from now on
	pub fn element_decorators(&self) -> Option<&[DecoratorSpec]> {
		self.element_decorators.as_deref()
	}

	/// Register a decorator
	pub fn add_decorator(&mut self, spec: impl Into<DecoratorSpec>) -> TableResult<&mut Self> {
		self.decorators.add(spec)?;
		Ok(self)
	}

	/// Register several decorators
	pub fn add_decorators<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = DecoratorSpec>,
	{
		self.decorators.add_many(specs)?;
		Ok(self)
	}

	/// Replace every decorator
	pub fn set_decorators<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = DecoratorSpec>,
	{
		self.decorators.set(specs)?;
		Ok(self)
	}

	/// Decorator under `name` (exact key, then suffix), resolving it if needed
	pub fn decorator(&mut self, name: &str) -> TableResult<Option<&dyn Decorator>> {
		self.decorators.get(name, &self.loader)
	}

	/// Every decorator, resolved, in order
	pub fn decorators(&mut self) -> TableResult<Vec<(String, &dyn Decorator)>> {
		self.decorators.decorators(&self.loader)
	}

	/// Registered decorator keys
	pub fn decorator_keys(&self) -> Vec<String> {
		self.decorators.keys()
	}

	/// Remove a decorator
	pub fn remove_decorator(&mut self, name: &str) -> bool {
		self.decorators.remove(name)
	}

	/// Remove every decorator
	pub fn clear_decorators(&mut self) -> &mut Self {
		self.decorators.clear();
		self
	}

	/// Skip the default decorators
	pub fn set_disable_load_default_decorators(&mut self, flag: bool) -> &mut Self {
		self.disable_load_default_decorators = flag;
		self
	}

	/// Whether the default decorators are skipped
	pub fn load_default_decorators_is_disabled(&self) -> bool {
		self.disable_load_default_decorators
	}

	/// Set the default CSS class, then add `DataTableElements` and
	/// `DataTable` when no decorator is registered
	pub fn load_default_decorators(&mut self) -> TableResult<&mut Self> {
		let has_class = self
			.attribs
			.get("class")
			.is_some_and(|class| !matches!(class, Value::Null | Value::Bool(false)) && class.as_str() != Some(""));
		if !has_class {
			self.attribs
				.insert("class".to_string(), Value::String(DEFAULT_CLASS.to_string()));
		}
		if self.disable_load_default_decorators || !self.decorators.is_empty() {
			return Ok(self);
		}
		tracing::debug!(table = %self.name, "loading default decorators");
		self.decorators.add("DataTableElements")?.add("DataTable")?;
		Ok(self)
	}

	/// Run the decorator chain
	pub fn render(&mut self, ctx: &RenderContext<'_>) -> TableResult<Content> {
		let loader = self.loader.clone();
		let mut chain = std::mem::take(&mut self.decorators);
		let result = chain.render(&loader, Owner::Table(self), ctx, Content::new());
		self.decorators = chain;
		if result.is_ok() {
			self.rendered = true;
		}
		result
	}

	/// Run only the decorator under `name` over `content`
	pub fn render_decorator(&mut self, name: &str, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		let loader = self.loader.clone();
		let mut chain = std::mem::take(&mut self.decorators);
		let target = chain
			.get(name, &loader)
			.map(|decorator| decorator.is_some_and(|d| d.kind_name() == ElementsDecorator::KIND));
		let renders_elements = match target {
			Ok(flag) => flag,
			Err(error) => {
				self.decorators = chain;
				return Err(error);
			}
		};
		let result = chain.render_only(name, &loader, Owner::Table(self), ctx, content);
		self.decorators = chain;
		if renders_elements && result.is_ok() {
			self.rendered = true;
		}
		result
	}

	/// Dispatch `render<Decorator>` calls
	pub fn call(&mut self, method: &str, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		match method.strip_prefix("render") {
			Some(name) if !name.is_empty() => self.render_decorator(name, ctx, content),
			_ => Err(TableError::UnknownMethod(method.to_string())),
		}
	}

	/// Rendered HTML; failures are logged and yield an empty string
	pub fn render_to_string(&mut self, ctx: &RenderContext<'_>) -> String {
		match self.render(ctx) {
			Ok(content) => content.to_html(),
			Err(error) => {
				tracing::warn!(table = %self.name, %error, "table rendering failed");
				String::new()
			}
		}
	}

	/// Whether the table has been rendered
	pub fn is_rendered(&self) -> bool {
		self.rendered
	}

	/// Search form named `name` whose text inputs filter this table's columns
	///
	/// Renders through the view's `FormDataTable` helper; the form fields are
	/// the markup of `fields`.
	pub fn render_search_form(
		&self,
		ctx: &RenderContext<'_>,
		name: &str,
		attribs: IndexMap<String, Value>,
		fields: Content,
	) -> TableResult<Content> {
		let view = ctx
			.view()
			.ok_or_else(|| TableError::ViewUnavailable("FormDataTable".to_string()))?;
		let helper = view
			.form_helper("FormDataTable")
			.ok_or_else(|| TableError::UnknownHelper("FormDataTable".to_string()))?;
		tracing::debug!(table = %self.name, form = name, "rendering search form");
		helper.render(view, name, attribs, fields, &self.id())
	}
}

/// Server-side response body for a page of `rows`
///
/// A `total` of `0` reports the number of rows as both totals.
///
/// # Examples
///
/// ```
/// use datatable_tables::table::encode_json;
/// use serde_json::json;
///
/// let body = encode_json(&[json!({"nome": "Ana"})], 3, 0).unwrap();
/// assert_eq!(
///     body,
///     r#"{"draw":3,"recordsTotal":1,"recordsFiltered":1,"data":[{"nome":"Ana"}]}"#
/// );
/// ```
pub fn encode_json(rows: &[Value], draw: u64, total: usize) -> TableResult<String> {
	let total = if total == 0 { rows.len() } else { total };
	let response = ServerResponse {
		draw,
		records_total: total,
		records_filtered: total,
		data: rows,
	};
	Ok(serde_json::to_string(&response)?)
}

fn custom_prefixes(loader: &PluginLoader, plugin_type: PluginType) -> Vec<String> {
	loader
		.prefixes(plugin_type)
		.iter()
		.filter(|prefix| prefix.as_str() != plugin_type.default_prefix())
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::element::ElementKind;
	use crate::view::HtmlView;
	use datatable_i18n::MessageCatalog;
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn options(order: Option<i32>) -> ElementOptions {
		ElementOptions {
			order,
			..ElementOptions::default()
		}
	}

	#[fixture]
	fn table() -> DataTable {
		let mut table = DataTable::new("grid").unwrap();
		table
			.add_new_element("text", "nome", ElementOptions::default())
			.unwrap()
			.add_new_element("text", "desc", ElementOptions::default())
			.unwrap()
			.add_new_element("button", "btn", ElementOptions::default())
			.unwrap();
		table
	}

	#[rstest]
	fn test_defaults(table: DataTable) {
		assert_eq!(table.decorator_keys(), ["DataTableElements", "DataTable"]);
		assert_eq!(table.attrib("class"), Some(&json!(DEFAULT_CLASS)));
		assert_eq!(table.method(), "post");
		assert_eq!(table.explicit_method(), None);
		assert_eq!(table.count(), 3);
	}

	#[rstest]
	fn test_insertion_order(mut table: DataTable) {
		assert_eq!(table.ordered_names().unwrap(), ["nome", "desc", "btn"]);
		assert_eq!(table.element_names(), ["nome", "desc", "btn"]);
	}

	#[rstest]
	fn test_explicit_orders() {
		let mut table = DataTable::new("grid").unwrap();
		table
			.add_new_element("text", "a", options(Some(2)))
			.unwrap()
			.add_new_element("text", "b", options(None))
			.unwrap()
			.add_new_element("text", "c", options(Some(0)))
			.unwrap()
			.add_new_element("text", "d", options(None))
			.unwrap();

		let names: Vec<&str> = table.iter().unwrap().into_iter().map(Element::name).collect();
		assert_eq!(names, ["c", "b", "a", "d"]);
	}

	#[rstest]
	fn test_order_conflict() {
		let mut table = DataTable::new("grid").unwrap();
		table
			.add_new_element("text", "a", options(Some(1)))
			.unwrap()
			.add_new_element("text", "b", options(Some(1)))
			.unwrap();

		assert!(matches!(
			table.ordered_names(),
			Err(TableError::OrderConflict { position: 1, .. })
		));
	}

	#[rstest]
	fn test_late_order_is_honoured(mut table: DataTable) {
		table.element_mut("btn").unwrap().set_order(Some(0));
		assert_eq!(table.ordered_names().unwrap(), ["btn", "nome", "desc"]);
	}

	#[rstest]
	fn test_recorded_order_outlives_later_changes(mut table: DataTable) {
		table
			.add_new_element("text", "extra", options(Some(2)))
			.unwrap();
		assert_eq!(table.ordered_names().unwrap(), ["nome", "desc", "extra", "btn"]);

		table.element_mut("extra").unwrap().set_order(Some(7));
		assert_eq!(table.ordered_names().unwrap(), ["nome", "desc", "extra", "btn"]);
	}

	#[rstest]
	fn test_remove_and_readd(mut table: DataTable) {
		assert!(table.remove_element("desc"));
		assert!(!table.remove_element("desc"));
		assert_eq!(table.ordered_names().unwrap(), ["nome", "btn"]);

		table.add_new_element("text", "desc", ElementOptions::default()).unwrap();
		assert_eq!(table.ordered_names().unwrap(), ["nome", "btn", "desc"]);
	}

	#[rstest]
	fn test_remove_from_iteration_keeps_element(mut table: DataTable) {
		assert!(table.remove_from_iteration("nome"));
		assert_eq!(table.ordered_names().unwrap(), ["desc", "btn"]);
		assert!(table.element("nome").is_some());
		assert_eq!(table.count(), 2);
	}

	#[rstest]
	fn test_unknown_element_kind(table: DataTable) {
		assert!(matches!(
			table.create_element("select", "x", ElementOptions::default()),
			Err(TableError::PluginResolution { .. })
		));
	}

	#[rstest]
	#[case("PUT", "put")]
	#[case("get", "get")]
	fn test_method(mut table: DataTable, #[case] input: &str, #[case] expected: &str) {
		table.set_method(input).unwrap();
		assert_eq!(table.method(), expected);
		assert_eq!(table.explicit_method(), Some(expected));
	}

	#[rstest]
	fn test_invalid_method(mut table: DataTable) {
		let error = table.set_method("patch").unwrap_err();
		assert_eq!(error.to_string(), "\"patch\" is an invalid form method");
	}

	#[rstest]
	#[case("method")]
	#[case("_hidden")]
	#[case("elements")]
	fn test_reserved_attributes(mut table: DataTable, #[case] name: &str) {
		assert!(matches!(
			table.set_attrib(name, json!("x")),
			Err(TableError::InvalidAttribute(_))
		));
	}

	#[rstest]
	fn test_id(mut table: DataTable) {
		assert_eq!(table.id(), "grid");
		table.set_is_array(true);
		assert_eq!(table.fully_qualified_name(), "grid[]");
		assert_eq!(table.id(), "grid");
		table.set_attrib("id", json!("main")).unwrap();
		assert_eq!(table.id(), "main");
	}

	#[rstest]
	fn test_values_skip_ignored_and_nest(mut table: DataTable) {
		table.element_mut("nome").unwrap().set_value(json!("<b>Ana</b>"));
		table.element_mut("desc").unwrap().set_value(json!("x")).set_ignore(true);
		table.set_is_array(true);

		assert_eq!(table.values(false).unwrap(), json!({"grid": {"nome": "Ana", "btn": null}}));
		assert_eq!(table.values(true).unwrap(), json!({"nome": "Ana", "btn": null}));
		assert_eq!(table.value("nome").unwrap(), Some(json!("Ana")));
		assert_eq!(table.unfiltered_value("nome"), Some(&json!("<b>Ana</b>")));
		assert_eq!(table.value("missing").unwrap(), None);
	}

	#[rstest]
	fn test_values_after_render_are_not_nested(mut table: DataTable) {
		table.set_is_array(true);
		let view = HtmlView::new();
		table.render(&RenderContext::new().with_view(&view)).unwrap();

		assert!(table.is_rendered());
		assert_eq!(table.values(false).unwrap(), json!({"nome": null, "desc": null, "btn": null}));
	}

	#[rstest]
	fn test_element_filters(mut table: DataTable) {
		table.set_element_filters([FilterSpec::kind("StringTrim")]);
		table.element_mut("nome").unwrap().set_value(json!(" <i>a</i> "));
		assert_eq!(table.value("nome").unwrap(), Some(json!("<i>a</i>")));
	}

	#[rstest]
	fn test_element_decorators_subset(mut table: DataTable) {
		table
			.set_element_decorators(vec![DecoratorSpec::kind("ViewHelper")], Some(&["desc"][..]), false)
			.unwrap();
		table.element_mut("desc").unwrap().clear_decorators();
		table
			.set_element_decorators(vec![], Some(&["desc"][..]), true)
			.unwrap();

		assert_eq!(table.element("nome").unwrap().decorator_keys(), ["ViewHelper"]);
		assert!(table.element("desc").unwrap().decorator_keys().is_empty());
		assert_eq!(table.element_decorators().map(<[DecoratorSpec]>::len), Some(0));
	}

	#[rstest]
	fn test_created_elements_inherit_element_decorators(mut table: DataTable) {
		table
			.set_element_decorators(vec![DecoratorSpec::alias("cell", "ViewHelper")], None, true)
			.unwrap();
		let element = table.create_element("hidden", "id", ElementOptions::default()).unwrap();
		assert_eq!(element.decorator_keys(), ["cell"]);
	}

	#[rstest]
	fn test_elements_from_value() {
		let mut table = DataTable::new("grid").unwrap();
		table
			.add_elements_from_value(&json!({
				"nome": "text",
				"id": {"type": "hidden", "options": {"order": 0}},
			}))
			.unwrap()
			.add_elements_from_value(&json!([["button", "edit", {"params": ["id"]}]]))
			.unwrap();

		assert_eq!(table.ordered_names().unwrap(), ["id", "nome", "edit"]);
		let button = table.element("edit").unwrap().button().unwrap();
		assert_eq!(button.params, ["id"]);
		assert!(matches!(
			table.add_elements_from_value(&json!([42])),
			Err(TableError::InvalidSpec(_))
		));
	}

	#[rstest]
	fn test_headless_render_keeps_content() {
		let mut table = DataTable::new("grid").unwrap();
		let options = ElementOptions {
			disable_load_default_decorators: Some(true),
			..ElementOptions::default()
		};
		table.add_new_element("text", "nome", options).unwrap();

		let content = table.render(&RenderContext::new()).unwrap();
		assert!(content.is_empty());
	}

	#[rstest]
	fn test_render_markup(mut table: DataTable) {
		table.element_mut("nome").unwrap().set_label("Nome");
		let view = HtmlView::new();
		let ctx = RenderContext::new().with_view(&view);

		let html = table.render_to_string(&ctx);

		assert!(html.starts_with(
			"<table cellpadding=\"0\" cellspacing=\"0\" border=\"0\" id=\"grid\" name=\"grid\" \
			 class=\"datatable table table-striped table-bordered\"><thead><tr role=\"row\">\
			 <th id=\"nome\" name=\"nome\" >Nome</th>"
		));
		assert!(html.contains("var grid = $(\"table#grid\").dataTable("));
	}

	#[rstest]
	fn test_render_decorator_marks_rendered(mut table: DataTable) {
		let view = HtmlView::new();
		let ctx = RenderContext::new().with_view(&view);

		let content = table.call("renderDataTableElements", &ctx, Content::new()).unwrap();

		assert_eq!(content.columns.len(), 3);
		assert!(table.is_rendered());
		assert!(matches!(
			table.call("renderMissing", &ctx, Content::new()),
			Err(TableError::UnknownDecorator(_))
		));
	}

	#[rstest]
	fn test_search_form_targets_table_id(table: DataTable) {
		let view = HtmlView::new();
		let ctx = RenderContext::new().with_view(&view);
		let mut attribs = IndexMap::new();
		attribs.insert("id".to_string(), json!("filters"));

		let form = table
			.render_search_form(&ctx, "filters", attribs, Content::from_markup("<input type=\"text\" name=\"nome\">"))
			.unwrap();

		assert!(form.markup.starts_with("<form id=\"filters\" name=\"filters\">"));
		assert!(form.scripts[0].contains("$('table[id=grid]').DataTable()"));
		assert!(matches!(
			table.render_search_form(&RenderContext::new(), "filters", IndexMap::new(), Content::new()),
			Err(TableError::ViewUnavailable(_))
		));
	}

	#[rstest]
	fn test_failed_partial_render_leaves_flag_unset(mut table: DataTable) {
		let result = table.call("renderDataTableElements", &RenderContext::new(), Content::new());

		assert!(matches!(result, Err(TableError::ViewUnavailable(_))));
		assert!(!table.is_rendered());
	}

	#[rstest]
	fn test_table_translator_reaches_elements(mut table: DataTable) {
		let mut catalog = MessageCatalog::new("pt_BR");
		catalog.add_translation("Description", "Descrição");
		table.set_translator(Some(Arc::new(catalog)));
		table.element_mut("desc").unwrap().set_label("Description");

		let view = HtmlView::new();
		let html = table.render_to_string(&RenderContext::new().with_view(&view));

		assert!(html.contains(">Descrição</th>"));
		assert!(table.element("desc").unwrap().has_translator());
	}

	#[rstest]
	fn test_element_prefix_paths_reach_elements(mut table: DataTable) {
		table.add_element_prefix_path(PluginType::Decorator, "App_Decorator_");
		let prefixes = table.element("nome").unwrap().loader().prefixes(PluginType::Decorator);
		assert_eq!(prefixes.last().map(String::as_str), Some("App_Decorator_"));

		let element = Element::new(ElementKind::Hidden, "extra").unwrap();
		table.add_element(element);
		let prefixes = table.element("extra").unwrap().loader().prefixes(PluginType::Decorator);
		assert!(prefixes.iter().any(|p| p == "App_Decorator_"));
	}

	#[rstest]
	#[case(0, 2)]
	#[case(40, 40)]
	fn test_encode_json_totals(#[case] total: usize, #[case] expected: usize) {
		let rows = [json!([1]), json!([2])];
		let body: Value = serde_json::from_str(&encode_json(&rows, 1, total).unwrap()).unwrap();
		assert_eq!(body["recordsTotal"], json!(expected));
		assert_eq!(body["recordsFiltered"], json!(expected));
		assert_eq!(body["data"], json!([[1], [2]]));
	}
}
