use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Decorator, Owner};
use crate::content::Content;
use crate::context::RenderContext;
use crate::error::{TableError, TableResult};
use crate::filter::options_of;
use crate::plugin::{Options, PluginLoader};
use crate::slot::{OnDuplicate, Slot, SlotMap};

/// How a decorator is handed to [`DecoratorChain::add`]
#[derive(Debug, Clone)]
pub enum DecoratorSpec {
	/// Live decorator, registered under its kind name
	Instance(Box<dyn Decorator>),
	/// Kind to resolve on first use, registered under the kind as given
	Kind {
		/// Short or qualified kind
		kind: String,
		/// Construction options
		options: Options,
	},
	/// Another spec registered under an explicit key
	Alias {
		/// Registry key
		alias: String,
		/// Decorator stored under the key
		spec: Box<DecoratorSpec>,
	},
}

impl DecoratorSpec {
	/// Deferred decorator without options
	pub fn kind(kind: impl Into<String>) -> Self {
		Self::with_options(kind, Options::new())
	}

	/// Deferred decorator with options
	pub fn with_options(kind: impl Into<String>, options: Options) -> Self {
		Self::Kind {
			kind: kind.into(),
			options,
		}
	}

	/// `spec` registered under `alias`
	pub fn alias(alias: impl Into<String>, spec: impl Into<DecoratorSpec>) -> Self {
		Self::Alias {
			alias: alias.into(),
			spec: Box::new(spec.into()),
		}
	}

	/// Parse a decorator entry of a settings document
	///
	/// Accepted shapes are `"Kind"`, `{"decorator": "Kind", "options": {..}}`,
	/// `["Kind", {..}]`, `[{"alias": "Kind"}, {..}]` and `{"alias": <spec>}`.
	///
	/// # Examples
	///
	/// ```
	/// use datatable_tables::decorator::DecoratorSpec;
	/// use serde_json::json;
	///
	/// let spec = DecoratorSpec::from_value(&json!({"cell": ["ViewHelper", {"helper": "x"}]})).unwrap();
	/// assert!(matches!(spec, DecoratorSpec::Alias { ref alias, .. } if alias == "cell"));
	/// assert!(DecoratorSpec::from_value(&json!({"0": "ViewHelper"})).is_err());
	/// assert!(DecoratorSpec::from_value(&json!(42)).is_err());
	/// ```
	pub fn from_value(value: &Value) -> TableResult<Self> {
		match value {
			Value::String(kind) => Ok(Self::kind(kind.as_str())),
			Value::Object(map) => {
				if let Some(kind) = map.get("decorator") {
					let kind = kind.as_str().ok_or_else(|| invalid_decorator(value))?;
					return Ok(Self::with_options(kind, options_of(map.get("options"))));
				}
				let mut pairs = map.iter();
				match (pairs.next(), pairs.next()) {
					(Some((alias, spec)), None) => Ok(Self::alias(valid_alias(alias)?, Self::from_value(spec)?)),
					_ => Err(invalid_decorator(value)),
				}
			}
			Value::Array(items) => {
				let options = options_of(items.get(1));
				match items.first() {
					Some(Value::String(kind)) => Ok(Self::with_options(kind.as_str(), options)),
					Some(Value::Object(map)) if map.len() == 1 => {
						let Some((alias, Value::String(kind))) = map.iter().next() else {
							return Err(invalid_decorator(value));
						};
						Ok(Self::alias(valid_alias(alias)?, Self::with_options(kind.as_str(), options)))
					}
					_ => Err(invalid_decorator(value)),
				}
			}
			_ => Err(invalid_decorator(value)),
		}
	}
}

impl<'de> Deserialize<'de> for DecoratorSpec {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		Self::from_value(&value).map_err(serde::de::Error::custom)
	}
}

impl From<&str> for DecoratorSpec {
	fn from(kind: &str) -> Self {
		Self::kind(kind)
	}
}

impl From<String> for DecoratorSpec {
	fn from(kind: String) -> Self {
		Self::kind(kind)
	}
}

impl From<Box<dyn Decorator>> for DecoratorSpec {
	fn from(decorator: Box<dyn Decorator>) -> Self {
		Self::Instance(decorator)
	}
}

fn valid_alias(alias: &str) -> TableResult<&str> {
	if alias.is_empty() || alias.parse::<i64>().is_ok() {
		return Err(TableError::InvalidSpec(
			"invalid decorator alias; must be an alphanumeric string".to_string(),
		));
	}
	Ok(alias)
}

fn invalid_decorator(value: &Value) -> TableError {
	TableError::InvalidSpec(format!("invalid decorator entry: {value}"))
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Ordered decorators of one element or table
///
/// Registering under an existing key replaces the decorator in place. A
/// decorator added by short kind is resolved on first use and its key
/// becomes the qualified kind name without moving; a resolved kind that is
/// already registered under its qualified name takes over that entry.
///
/// ```mermaid
/// flowchart LR
///     T[DataTable] --> E[DataTableElements]
///     E -->|per element, resolved order| V[ViewHelper]
///     V -->|cell, column, script| E
///     E -->|accumulated content| F[DataTable frame]
///     F --> O[table markup and grid script]
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecoratorChain {
	slots: SlotMap<dyn Decorator>,
}

impl DecoratorChain {
	/// Create an empty chain
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a decorator
	pub fn add(&mut self, spec: impl Into<DecoratorSpec>) -> TableResult<&mut Self> {
		match spec.into() {
			DecoratorSpec::Instance(decorator) => {
				let key = decorator.kind_name().to_string();
				self.slots.insert(key, Slot::Resolved(decorator));
			}
			DecoratorSpec::Kind { kind, options } => {
				self.slots.insert(kind.clone(), Slot::deferred(kind, options));
			}
			DecoratorSpec::Alias { alias, spec } => {
				let alias = valid_alias(&alias)?.to_string();
				match *spec {
					DecoratorSpec::Instance(decorator) => self.slots.insert(alias, Slot::Resolved(decorator)),
					DecoratorSpec::Kind { kind, options } => self.slots.insert(alias, Slot::deferred(kind, options)),
					DecoratorSpec::Alias { .. } => {
						return Err(TableError::InvalidSpec(format!(
							"decorator alias '{alias}' must name a kind or an instance"
						)));
					}
				}
			}
		}
		Ok(self)
	}

	/// Register several decorators in order
	pub fn add_many<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = DecoratorSpec>,
	{
		for spec in specs {
			self.add(spec)?;
		}
		Ok(self)
	}

	/// Replace every decorator
	pub fn set<I>(&mut self, specs: I) -> TableResult<&mut Self>
	where
		I: IntoIterator<Item = DecoratorSpec>,
	{
		self.clear();
		self.add_many(specs)
	}

	/// Decorator registered under exactly `key`, resolving it if needed
	pub fn get_exact(&mut self, key: &str, loader: &PluginLoader) -> TableResult<Option<&dyn Decorator>> {
		match self.slots.find_exact(key) {
			Some(key) => self.resolved(&key, loader),
			None => Ok(None),
		}
	}

	/// First decorator whose key ends with `name`, ignoring case
	pub fn get_by_suffix(&mut self, name: &str, loader: &PluginLoader) -> TableResult<Option<&dyn Decorator>> {
		match self.slots.find_by_suffix(name) {
			Some(key) => self.resolved(&key, loader),
			None => Ok(None),
		}
	}

	/// Exact key first, then suffix match
	pub fn get(&mut self, name: &str, loader: &PluginLoader) -> TableResult<Option<&dyn Decorator>> {
		match self.slots.find(name) {
			Some(key) => self.resolved(&key, loader),
			None => Ok(None),
		}
	}

	fn resolved(&mut self, key: &str, loader: &PluginLoader) -> TableResult<Option<&dyn Decorator>> {
		let key = self.resolve(key, loader)?;
		Ok(self.slots.resolved(&key))
	}

	fn resolve(&mut self, key: &str, loader: &PluginLoader) -> TableResult<String> {
		self.slots.resolve(key, OnDuplicate::Replace, |kind, options| {
			loader.load_decorator(kind, options)
		})
	}

	/// Remove the decorator under `name` (exact key, then suffix)
	pub fn remove(&mut self, name: &str) -> bool {
		match self.slots.find(name) {
			Some(key) => self.slots.remove(&key).is_some(),
			None => false,
		}
	}

	/// Remove every decorator
	pub fn clear(&mut self) {
		self.slots.clear();
	}

	/// Registered keys in order
	pub fn keys(&self) -> Vec<String> {
		self.slots.keys().map(str::to_string).collect()
	}

	/// Number of decorators
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether no decorator is registered
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Resolve every deferred decorator
	pub fn resolve_all(&mut self, loader: &PluginLoader) -> TableResult<()> {
		self.slots
			.resolve_all(OnDuplicate::Replace, |kind, options| loader.load_decorator(kind, options))
	}

	/// Resolved decorators in order
	pub fn decorators(&mut self, loader: &PluginLoader) -> TableResult<Vec<(String, &dyn Decorator)>> {
		self.resolve_all(loader)?;
		Ok(self
			.slots
			.iter()
			.filter_map(|(key, slot)| slot.as_resolved().map(|d| (key.to_string(), d)))
			.collect())
	}

	/// Run every decorator over `content` for `owner`
	pub fn render(
		&mut self,
		loader: &PluginLoader,
		mut owner: Owner<'_>,
		ctx: &RenderContext<'_>,
		content: Content,
	) -> TableResult<Content> {
		self.resolve_all(loader)?;
		let mut content = content;
		for (_, slot) in self.slots.iter_mut() {
			if let Some(decorator) = slot.as_resolved_mut() {
				content = render_one(decorator, owner.reborrow(), ctx, content)?;
			}
		}
		Ok(content)
	}

	/// Run only the decorator under `name` (exact key, then suffix)
	pub fn render_only(
		&mut self,
		name: &str,
		loader: &PluginLoader,
		owner: Owner<'_>,
		ctx: &RenderContext<'_>,
		content: Content,
	) -> TableResult<Content> {
		let key = self
			.slots
			.find(name)
			.ok_or_else(|| TableError::UnknownDecorator(name.to_string()))?;
		let key = self.resolve(&key, loader)?;
		let decorator = self
			.slots
			.resolved_mut(&key)
			.ok_or_else(|| TableError::UnknownDecorator(name.to_string()))?;
		render_one(decorator, owner, ctx, content)
	}
}

fn render_one(
	decorator: &mut dyn Decorator,
	owner: Owner<'_>,
	ctx: &RenderContext<'_>,
	content: Content,
) -> TableResult<Content> {
	if !decorator.accepts(owner.kind()) {
		return Err(TableError::Binding {
			decorator: decorator.kind_name().to_string(),
			owner: owner.describe(),
		});
	}
	decorator.render(owner, ctx, content)
}
