//! Table elements
//!
//! An element is one column of a table: a validated name, typed settings,
//! free-form HTML attributes, a value with its filter chain and a decorator
//! chain that renders it. Elements are usually created through
//! [`DataTable::create_element`](crate::table::DataTable::create_element),
//! which hands down the table's plugin prefixes and element decorators.

use datatable_i18n::SharedTranslator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnOptions;
use crate::content::Content;
use crate::context::RenderContext;
use crate::decorator::{Decorator, DecoratorChain, DecoratorSpec, Owner};
use crate::error::{TableError, TableResult};
use crate::filter::{Filter, FilterChain, FilterSpec};
use crate::name::{id_from_name, validate_name};
use crate::plugin::{PluginLoader, PluginType};
use crate::settings::ElementOptions;
use crate::view::Route;

/// Names held by typed fields; they cannot be used as free attributes
pub const RESERVED_ATTRIBUTES: &[&str] = &[
	"name",
	"label",
	"description",
	"order",
	"value",
	"ignore",
	"is_array",
	"isArray",
	"helper",
	"id",
	"translator",
	"decorators",
	"filters",
	"options",
	"column",
	"type",
];

/// Settings of a button column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
	/// Columns whose row values are appended to the URL on click
	#[serde(default)]
	pub params: Vec<String>,
	/// Target route
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<Route>,
	/// Confirmation message shown before navigating
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub modal: Option<String>,
}

impl ButtonConfig {
	/// Append a column to the URL parameters
	pub fn add_param(&mut self, name: impl Into<String>) -> &mut Self {
		self.params.push(name.into());
		self
	}

	/// Append several columns to the URL parameters
	pub fn add_params<I, S>(&mut self, names: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.params.extend(names.into_iter().map(Into::into));
		self
	}

	/// Set the target route
	pub fn set_url(&mut self, route: Route) -> &mut Self {
		self.url = Some(route);
		self
	}

	/// Ask for confirmation with `message` before navigating
	pub fn set_modal(&mut self, message: impl Into<String>) -> &mut Self {
		self.modal = Some(message.into());
		self
	}

	/// Builder form of [`add_params`](Self::add_params)
	pub fn with_params<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.add_params(names);
		self
	}

	/// Builder form of [`set_url`](Self::set_url)
	pub fn with_url(mut self, route: Route) -> Self {
		self.url = Some(route);
		self
	}

	/// Builder form of [`set_modal`](Self::set_modal)
	pub fn with_modal(mut self, message: impl Into<String>) -> Self {
		self.modal = Some(message.into());
		self
	}
}

/// What an element renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
	/// Visible data column
	Text,
	/// Data column the grid keeps hidden
	Hidden,
	/// Action column
	Button(ButtonConfig),
	/// Kind registered by the application
	Custom {
		/// Qualified type name, e.g. `App_Element_Rating`
		type_name: String,
		/// View helper; derived from the type name when unset
		helper: Option<String>,
	},
}

impl ElementKind {
	/// Qualified type name
	pub fn type_name(&self) -> &str {
		match self {
			Self::Text => "DataTable_Element_Text",
			Self::Hidden => "DataTable_Element_Hidden",
			Self::Button(_) => "DataTable_Element_Button",
			Self::Custom { type_name, .. } => type_name,
		}
	}

	/// View helper the kind renders through by default
	pub fn default_helper(&self) -> Option<&str> {
		match self {
			Self::Text => Some("DataTableText"),
			Self::Hidden => Some("DataTableHidden"),
			Self::Button(_) => Some("DataTableButton"),
			Self::Custom { helper, .. } => helper.as_deref(),
		}
	}

	fn strips_markup(&self) -> bool {
		matches!(self, Self::Text | Self::Button(_))
	}
}

/// One column of a data table
///
/// # Examples
///
/// ```
/// use datatable_tables::element::{Element, ElementKind};
/// use serde_json::json;
///
/// let mut element = Element::new(ElementKind::Text, "nome").unwrap();
/// element.set_label("Nome").set_value(json!("  <b>Ana</b> "));
///
/// assert_eq!(element.id(), "nome");
/// assert_eq!(element.filtered_value().unwrap(), json!("Ana"));
/// assert_eq!(element.decorator_keys(), ["ViewHelper"]);
/// ```
#[derive(Debug, Clone)]
pub struct Element {
	name: String,
	kind: ElementKind,
	label: Option<String>,
	description: Option<String>,
	order: Option<i32>,
	value: Value,
	ignore: bool,
	is_array: bool,
	helper: Option<String>,
	id: Option<String>,
	column: ColumnOptions,
	attribs: IndexMap<String, Value>,
	translator: Option<SharedTranslator>,
	disable_translator: bool,
	disable_load_default_decorators: bool,
	filters: FilterChain,
	decorators: DecoratorChain,
	loader: PluginLoader,
	partial_rendering: bool,
}

impl Element {
	/// Element resolving plugins through the built-in registry
	pub fn new(kind: ElementKind, name: &str) -> TableResult<Self> {
		Self::build(kind, name, PluginLoader::builtin(), ElementOptions::default())
	}

	/// Element configured from `options`
	///
	/// Options are applied first, then kind filters are installed and the
	/// default decorators are loaded if no decorator was configured.
	pub fn build(kind: ElementKind, name: &str, loader: PluginLoader, options: ElementOptions) -> TableResult<Self> {
		let name = validate_name(name)?;
		let mut element = Self {
			name,
			kind,
			label: None,
			description: None,
			order: None,
			value: Value::Null,
			ignore: false,
			is_array: false,
			helper: None,
			id: None,
			column: ColumnOptions::default(),
			attribs: IndexMap::new(),
			translator: None,
			disable_translator: false,
			disable_load_default_decorators: false,
			filters: FilterChain::new(),
			decorators: DecoratorChain::new(),
			loader,
			partial_rendering: false,
		};
		element.set_options(options)?;
		if element.kind.strips_markup() {
			element.add_filters([FilterSpec::kind("StripTags"), FilterSpec::kind("StringTrim")]);
		}
		element.load_default_decorators()?;
		Ok(element)
	}

	/// Apply every option that is set
	pub fn set_options(&mut self, options: ElementOptions) -> TableResult<&mut Self> {
		let ElementOptions {
			label,
			description,
			value,
			order,
			ignore,
			is_array,
			helper,
			id,
			column,
			params,
			url,
			modal,
			decorators,
			filters,
			disable_load_default_decorators,
			disable_translator,
			prefix_paths,
			attribs,
		} = options;

		for path in prefix_paths {
			self.loader.add_prefix_path(path.plugin_type, path.prefix);
		}
		if let Some(flag) = disable_load_default_decorators {
			self.disable_load_default_decorators = flag;
		}
		if let Some(flag) = disable_translator {
			self.disable_translator = flag;
		}
		if label.is_some() {
			self.label = label;
		}
		if description.is_some() {
			self.description = description;
		}
		if let Some(value) = value {
			self.value = value;
		}
		if order.is_some() {
			self.order = order;
		}
		if let Some(flag) = ignore {
			self.ignore = flag;
		}
		if let Some(flag) = is_array {
			self.is_array = flag;
		}
		if helper.is_some() {
			self.helper = helper;
		}
		if id.is_some() {
			self.id = id;
		}
		if let Some(column) = column {
			self.column = column;
		}
		match &mut self.kind {
			ElementKind::Button(config) => {
				config.add_params(params);
				if url.is_some() {
					config.url = url;
				}
				if modal.is_some() {
					config.modal = modal;
				}
			}
			_ if !params.is_empty() || url.is_some() || modal.is_some() => {
				tracing::debug!(element = %self.name, "button options ignored on a non-button element");
			}
			_ => {}
		}
		if let Some(filters) = filters {
			self.set_filters(filters);
		}
		if let Some(decorators) = decorators {
			self.set_decorators(decorators)?;
		}
		self.add_attribs(attribs)?;
		Ok(self)
	}

	/// Validated name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name with `[]` appended for array elements
	pub fn fully_qualified_name(&self) -> String {
		if self.is_array {
			format!("{}[]", self.name)
		} else {
			self.name.clone()
		}
	}

	/// Explicit id, else one derived from the fully qualified name
	pub fn id(&self) -> String {
		match &self.id {
			Some(id) => id.clone(),
			None => id_from_name(&self.fully_qualified_name()),
		}
	}

	/// Set an explicit id
	pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
		self.id = Some(id.into());
		self
	}

	/// Element kind
	pub fn kind(&self) -> &ElementKind {
		&self.kind
	}

	/// Qualified type name of the kind
	pub fn type_name(&self) -> &str {
		self.kind.type_name()
	}

	/// Button settings, for button elements
	pub fn button(&self) -> Option<&ButtonConfig> {
		match &self.kind {
			ElementKind::Button(config) => Some(config),
			_ => None,
		}
	}

	/// Mutable button settings, for button elements
	pub fn button_mut(&mut self) -> Option<&mut ButtonConfig> {
		match &mut self.kind {
			ElementKind::Button(config) => Some(config),
			_ => None,
		}
	}

	/// Untranslated label
	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Set the label
	pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
		self.label = Some(label.into());
		self
	}

	/// Label passed through the effective translator
	pub fn translated_label(&self, ctx: &RenderContext<'_>) -> Option<String> {
		let label = self.label.as_deref()?;
		Some(match self.translator(ctx) {
			Some(translator) => translator.translate(label),
			None => label.to_string(),
		})
	}

	/// Description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Set the description
	pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
		self.description = Some(description.into());
		self
	}

	/// Order hint, `None` when unassigned
	pub fn order(&self) -> Option<i32> {
		self.order
	}

	/// Set the order hint
	pub fn set_order(&mut self, order: Option<i32>) -> &mut Self {
		self.order = order;
		self
	}

	/// Stored value, unfiltered
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Stored value, unfiltered
	pub fn unfiltered_value(&self) -> &Value {
		&self.value
	}

	/// Set the value
	pub fn set_value(&mut self, value: Value) -> &mut Self {
		self.value = value;
		self
	}

	/// Value passed through every filter
	pub fn filtered_value(&mut self) -> TableResult<Value> {
		self.filters.apply(&self.loader, &self.value)
	}

	/// Whether the table's aggregate values skip this element
	pub fn ignore(&self) -> bool {
		self.ignore
	}

	/// Exclude from or include in the aggregate values
	pub fn set_ignore(&mut self, flag: bool) -> &mut Self {
		self.ignore = flag;
		self
	}

	/// Whether the element holds a list
	pub fn is_array(&self) -> bool {
		self.is_array
	}

	/// Mark the element as holding a list
	pub fn set_is_array(&mut self, flag: bool) -> &mut Self {
		self.is_array = flag;
		self
	}

	/// View helper, explicit or the kind's default
	pub fn helper(&self) -> Option<&str> {
		self.helper.as_deref().or_else(|| self.kind.default_helper())
	}

	/// Render through another view helper
	pub fn set_helper(&mut self, helper: impl Into<String>) -> &mut Self {
		self.helper = Some(helper.into());
		self
	}

	/// Grid options of the column
	pub fn column_options(&self) -> &ColumnOptions {
		&self.column
	}

	/// Mutable grid options of the column
	pub fn column_options_mut(&mut self) -> &mut ColumnOptions {
		&mut self.column
	}

	/// Replace the grid options of the column
	pub fn set_column_options(&mut self, options: ColumnOptions) -> &mut Self {
		self.column = options;
		self
	}

	/// Set a free attribute
	///
	/// Names starting with `_` or held by a typed field are rejected.
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

	/// Set or unset the element's own translator
	pub fn set_translator(&mut self, translator: Option<SharedTranslator>) -> &mut Self {
		self.translator = translator;
		self
	}

	/// Whether the element has a translator of its own
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

	/// Plugin loader for decorators and filters
	pub fn loader(&self) -> &PluginLoader {
		&self.loader
	}

	/// Add a plugin prefix
	pub fn add_prefix_path(&mut self, plugin_type: PluginType, prefix: impl Into<String>) -> &mut Self {
		self.loader.add_prefix_path(plugin_type, prefix);
		self
	}

	/// Register a filter
	pub fn add_filter(&mut self, spec: impl Into<FilterSpec>) -> &mut Self {
		self.filters.add(spec);
		self
	}

	/// Register several filters
	pub fn add_filters<I>(&mut self, specs: I) -> &mut Self
	where
		I: IntoIterator<Item = FilterSpec>,
	{
		self.filters.add_many(specs);
		self
	}

	/// Replace every filter
	pub fn set_filters<I>(&mut self, specs: I) -> &mut Self
	where
		I: IntoIterator<Item = FilterSpec>,
	{
		self.filters.clear();
		self.filters.add_many(specs);
		self
	}

	/// Filter under `name`, resolving it if needed
	pub fn filter(&mut self, name: &str) -> TableResult<Option<&dyn Filter>> {
		self.filters.get(name, &self.loader)
	}

	/// Registered filters
	pub fn filters(&self) -> &FilterChain {
		&self.filters
	}

	/// Remove a filter
	pub fn remove_filter(&mut self, name: &str) -> bool {
		self.filters.remove(name)
	}

	/// Remove every filter
	pub fn clear_filters(&mut self) -> &mut Self {
		self.filters.clear();
		self
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

	/// Add `ViewHelper` when no decorator is registered
	pub fn load_default_decorators(&mut self) -> TableResult<&mut Self> {
		if self.disable_load_default_decorators || !self.decorators.is_empty() {
			return Ok(self);
		}
		tracing::debug!(element = %self.name, "loading default decorators");
		self.decorators.add("ViewHelper")?;
		Ok(self)
	}

	/// Run the decorator chain
	///
	/// Returns empty content while a single decorator of this element is
	/// being rendered.
	pub fn render(&mut self, ctx: &RenderContext<'_>) -> TableResult<Content> {
		if self.partial_rendering {
			return Ok(Content::new());
		}
		let loader = self.loader.clone();
		let mut chain = std::mem::take(&mut self.decorators);
		let result = chain.render(&loader, Owner::Element(self), ctx, Content::new());
		self.decorators = chain;
		result
	}

	/// Run only the decorator under `name` over `content`
	pub fn render_decorator(&mut self, name: &str, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		let loader = self.loader.clone();
		let mut chain = std::mem::take(&mut self.decorators);
		self.partial_rendering = true;
		let result = chain.render_only(name, &loader, Owner::Element(self), ctx, content);
		self.partial_rendering = false;
		self.decorators = chain;
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
				tracing::warn!(element = %self.name, %error, "element rendering failed");
				String::new()
			}
		}
	}
}

pub(crate) fn check_attribute(name: &str, reserved: &[&str]) -> TableResult<()> {
	if name.is_empty() || name.starts_with('_') || reserved.contains(&name) {
		return Err(TableError::InvalidAttribute(name.to_string()));
	}
	Ok(())
}
