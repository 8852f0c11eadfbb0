//! Value filters and the per-element filter chain

use std::fmt::Debug;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{TableError, TableResult};
use crate::plugin::{Options, PluginLoader};
use crate::slot::{Named, OnDuplicate, Slot, SlotMap};

/// Transforms string values of an element
pub trait Filter: Debug + Send + Sync {
	/// Qualified kind name, e.g. `Filter_StringTrim`
	fn kind_name(&self) -> &str;

	/// Filter a single string
	fn filter(&self, value: &str) -> String;

	/// Clone into a new box
	fn clone_box(&self) -> Box<dyn Filter>;
}

impl Clone for Box<dyn Filter> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl Named for dyn Filter {
	fn canonical_name(&self) -> &str {
		self.kind_name()
	}
}

static TAG: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|</?\s*([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid tag pattern"));

/// Removes markup tags, keeping the ones listed in `allowTags`
#[derive(Debug, Clone, Default)]
pub struct StripTags {
	allowed: Vec<String>,
}

impl StripTags {
	/// Build from options; `allowTags` is a tag name or a list of them
	pub fn new(options: &Options) -> Self {
		let allowed = match options.get("allowTags") {
			Some(Value::String(tag)) => vec![tag.to_lowercase()],
			Some(Value::Array(tags)) => tags
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_lowercase)
				.collect(),
			_ => Vec::new(),
		};
		Self { allowed }
	}
}

impl Filter for StripTags {
	fn kind_name(&self) -> &str {
		"Filter_StripTags"
	}

	fn filter(&self, value: &str) -> String {
		TAG.replace_all(value, |caps: &regex::Captures<'_>| match caps.get(1) {
			Some(tag) if self.allowed.contains(&tag.as_str().to_lowercase()) => caps[0].to_string(),
			_ => String::new(),
		})
		.into_owned()
	}

	fn clone_box(&self) -> Box<dyn Filter> {
		Box::new(self.clone())
	}
}

/// Trims whitespace, or the characters of `charlist`, from both ends
#[derive(Debug, Clone, Default)]
pub struct StringTrim {
	charlist: Option<Vec<char>>,
}

impl StringTrim {
	/// Build from options; `charlist` replaces the whitespace default
	pub fn new(options: &Options) -> Self {
		let charlist = options
			.get("charlist")
			.and_then(Value::as_str)
			.map(|list| list.chars().collect());
		Self { charlist }
	}
}

impl Filter for StringTrim {
	fn kind_name(&self) -> &str {
		"Filter_StringTrim"
	}

	fn filter(&self, value: &str) -> String {
		match &self.charlist {
			Some(chars) => value.trim_matches(chars.as_slice()).to_string(),
			None => value.trim().to_string(),
		}
	}

	fn clone_box(&self) -> Box<dyn Filter> {
		Box::new(self.clone())
	}
}

/// How a filter is handed to [`FilterChain::add`]
#[derive(Debug, Clone)]
pub enum FilterSpec {
	/// Live filter, registered under its kind name
	Instance(Box<dyn Filter>),
	/// Kind to resolve on first use
	Kind {
		/// Short or qualified kind
		kind: String,
		/// Construction options
		options: Options,
	},
}

impl FilterSpec {
	/// Deferred filter without options
	pub fn kind(kind: impl Into<String>) -> Self {
		Self::Kind {
			kind: kind.into(),
			options: Options::new(),
		}
	}

	/// Parse `"Kind"`, `{"filter": "Kind", "options": {..}}` or `["Kind", {..}]`
	pub fn from_value(value: &Value) -> TableResult<Self> {
		match value {
			Value::String(kind) => Ok(Self::kind(kind.as_str())),
			Value::Object(map) => match map.get("filter").and_then(Value::as_str) {
				Some(kind) => Ok(Self::Kind {
					kind: kind.to_string(),
					options: options_of(map.get("options")),
				}),
				None => Err(invalid_filter(value)),
			},
			Value::Array(items) => match items.first().and_then(Value::as_str) {
				Some(kind) => Ok(Self::Kind {
					kind: kind.to_string(),
					options: options_of(items.get(1)),
				}),
				None => Err(invalid_filter(value)),
			},
			_ => Err(invalid_filter(value)),
		}
	}
}

impl<'de> Deserialize<'de> for FilterSpec {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		Self::from_value(&value).map_err(serde::de::Error::custom)
	}
}

impl From<&str> for FilterSpec {
	fn from(kind: &str) -> Self {
		Self::kind(kind)
	}
}

fn invalid_filter(value: &Value) -> TableError {
	TableError::InvalidSpec(format!("invalid filter entry: {value}"))
}

pub(crate) fn options_of(value: Option<&Value>) -> Options {
	match value {
		Some(Value::Object(options)) => options.clone(),
		_ => Options::new(),
	}
}

/// Ordered filters of one element
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
	slots: SlotMap<dyn Filter>,
}

impl FilterChain {
	/// Create an empty chain
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a filter; its key is the kind it was given as
	pub fn add(&mut self, spec: impl Into<FilterSpec>) -> &mut Self {
		match spec.into() {
			FilterSpec::Instance(filter) => {
				let key = filter.kind_name().to_string();
				self.slots.insert(key, Slot::Resolved(filter));
			}
			FilterSpec::Kind { kind, options } => {
				self.slots.insert(kind.clone(), Slot::deferred(kind, options));
			}
		}
		self
	}

	/// Register several filters in order
	pub fn add_many<I>(&mut self, specs: I) -> &mut Self
	where
		I: IntoIterator<Item = FilterSpec>,
	{
		for spec in specs {
			self.add(spec);
		}
		self
	}

	/// Filter under `name` (exact key, then suffix), resolving it if needed
	pub fn get(&mut self, name: &str, loader: &PluginLoader) -> TableResult<Option<&dyn Filter>> {
		let Some(key) = self.slots.find(name) else {
			return Ok(None);
		};
		let key = self
			.slots
			.resolve(&key, OnDuplicate::Reject, |kind, options| loader.load_filter(kind, options))?;
		Ok(self.slots.resolved(&key))
	}

	/// Remove the filter under `name` (exact key, then suffix)
	pub fn remove(&mut self, name: &str) -> bool {
		match self.slots.find(name) {
			Some(key) => self.slots.remove(&key).is_some(),
			None => false,
		}
	}

	/// Remove every filter
	pub fn clear(&mut self) {
		self.slots.clear();
	}

	/// Registered keys in order
	pub fn keys(&self) -> Vec<String> {
		self.slots.keys().map(str::to_string).collect()
	}

	/// Number of filters
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether no filter is registered
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Resolve every deferred filter
	pub fn resolve_all(&mut self, loader: &PluginLoader) -> TableResult<()> {
		self.slots
			.resolve_all(OnDuplicate::Reject, |kind, options| loader.load_filter(kind, options))
	}

	/// Run every filter over `value`, descending into lists and maps
	pub fn apply(&mut self, loader: &PluginLoader, value: &Value) -> TableResult<Value> {
		self.resolve_all(loader)?;
		let filters: Vec<&dyn Filter> = self.slots.iter().filter_map(|(_, slot)| slot.as_resolved()).collect();
		Ok(apply_all(&filters, value))
	}
}

fn apply_all(filters: &[&dyn Filter], value: &Value) -> Value {
	match value {
		Value::String(s) => Value::String(filters.iter().fold(s.clone(), |acc, f| f.filter(&acc))),
		Value::Array(items) => Value::Array(items.iter().map(|v| apply_all(filters, v)).collect()),
		Value::Object(map) => Value::Object(
			map.iter()
				.map(|(k, v)| (k.clone(), apply_all(filters, v)))
				.collect(),
		),
		other => other.clone(),
	}
}
