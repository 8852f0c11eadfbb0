//! Ordered registries of lazily resolved plugins
//!
//! Decorators and filters are registered either as live instances or as a
//! deferred `{kind, options}` pair. A deferred slot is resolved on first use
//! and replaced in place; when its key was the kind itself, the key becomes
//! the instance's canonical name without changing its position.

use indexmap::IndexMap;

use crate::error::{TableError, TableResult};
use crate::plugin::Options;

/// Plugins that report a canonical (fully qualified) name
pub trait Named {
	/// Canonical name of the plugin instance
	fn canonical_name(&self) -> &str;
}

/// A registry entry
pub enum Slot<T: ?Sized> {
	/// Live instance
	Resolved(Box<T>),
	/// Kind and options to instantiate on first use
	Deferred {
		/// Short or qualified kind name
		kind: String,
		/// Construction options
		options: Options,
	},
}

impl<T: ?Sized> Slot<T> {
	/// Deferred slot for `kind`
	pub fn deferred(kind: impl Into<String>, options: Options) -> Self {
		Self::Deferred {
			kind: kind.into(),
			options,
		}
	}

	/// Whether the slot holds a live instance
	pub fn is_resolved(&self) -> bool {
		matches!(self, Self::Resolved(_))
	}

	/// Live instance, if resolved
	pub fn as_resolved(&self) -> Option<&T> {
		match self {
			Self::Resolved(instance) => Some(instance.as_ref()),
			Self::Deferred { .. } => None,
		}
	}

	/// Mutable live instance, if resolved
	pub fn as_resolved_mut(&mut self) -> Option<&mut T> {
		match self {
			Self::Resolved(instance) => Some(instance.as_mut()),
			Self::Deferred { .. } => None,
		}
	}
}

impl<T: ?Sized> Clone for Slot<T>
where
	Box<T>: Clone,
{
	fn clone(&self) -> Self {
		match self {
			Self::Resolved(instance) => Self::Resolved(instance.clone()),
			Self::Deferred { kind, options } => Self::Deferred {
				kind: kind.clone(),
				options: options.clone(),
			},
		}
	}
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for Slot<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Resolved(instance) => f.debug_tuple("Resolved").field(instance).finish(),
			Self::Deferred { kind, options } => f
				.debug_struct("Deferred")
				.field("kind", kind)
				.field("options", options)
				.finish(),
		}
	}
}

/// What to do when a resolved canonical name is already registered under
/// another key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDuplicate {
	/// The resolved slot takes over and the other entry is dropped
	Replace,
	/// Resolution fails
	Reject,
}

/// Insertion ordered map of slots
pub struct SlotMap<T: ?Sized> {
	slots: IndexMap<String, Slot<T>>,
}

impl<T: ?Sized> Default for SlotMap<T> {
	fn default() -> Self {
		Self {
			slots: IndexMap::new(),
		}
	}
}

impl<T: ?Sized> Clone for SlotMap<T>
where
	Box<T>: Clone,
{
	fn clone(&self) -> Self {
		Self {
			slots: self.slots.clone(),
		}
	}
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for SlotMap<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.slots.iter()).finish()
	}
}

impl<T: ?Sized + Named> SlotMap<T> {
	/// Create an empty map
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert under `key`; an existing key keeps its position
	pub fn insert(&mut self, key: impl Into<String>, slot: Slot<T>) {
		self.slots.insert(key.into(), slot);
	}

	/// Slot stored under exactly `key`
	pub fn get(&self, key: &str) -> Option<&Slot<T>> {
		self.slots.get(key)
	}

	/// Whether `key` is registered
	pub fn contains_key(&self, key: &str) -> bool {
		self.slots.contains_key(key)
	}

	/// Remove `key`, closing the gap it leaves
	pub fn remove(&mut self, key: &str) -> Option<Slot<T>> {
		self.slots.shift_remove(key)
	}

	/// Remove every slot
	pub fn clear(&mut self) {
		self.slots.clear();
	}

	/// Registered keys in insertion order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.slots.keys().map(String::as_str)
	}

	/// Number of slots
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether the map is empty
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Slots in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot<T>)> {
		self.slots.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Mutable slots in insertion order
	pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Slot<T>)> {
		self.slots.iter_mut().map(|(k, v)| (k.as_str(), v))
	}

	/// `name` itself, when registered
	pub fn find_exact(&self, name: &str) -> Option<String> {
		self.slots.get_key_value(name).map(|(k, _)| k.clone())
	}

	/// First key, in insertion order, ending with `name` regardless of case
	pub fn find_by_suffix(&self, name: &str) -> Option<String> {
		if name.is_empty() {
			return None;
		}
		let needle = name.to_lowercase();
		self.slots
			.keys()
			.find(|key| key.len() >= name.len() && key.to_lowercase().ends_with(&needle))
			.cloned()
	}

	/// Exact key first, then suffix match
	pub fn find(&self, name: &str) -> Option<String> {
		self.find_exact(name).or_else(|| self.find_by_suffix(name))
	}

	/// Resolve the slot under `key`, returning the key it ends up under
	///
	/// Deferred slots are built with `build`. When the key equals the
	/// deferred kind and the instance reports another canonical name, the
	/// slot is re-keyed in place.
	pub fn resolve<F>(&mut self, key: &str, on_duplicate: OnDuplicate, build: F) -> TableResult<String>
	where
		F: FnOnce(&str, &Options) -> TableResult<Box<T>>,
	{
		let Some((index, _, slot)) = self.slots.get_full(key) else {
			return Err(TableError::InvalidSpec(format!("no slot registered under '{key}'")));
		};
		let (kind, options) = match slot {
			Slot::Resolved(_) => return Ok(key.to_string()),
			Slot::Deferred { kind, options } => (kind.clone(), options.clone()),
		};

		let instance = build(&kind, &options)?;
		let canonical = instance.canonical_name().to_string();

		if key != kind || canonical == key {
			self.slots[index] = Slot::Resolved(instance);
			return Ok(key.to_string());
		}

		let mut index = index;
		if let Some(existing) = self.slots.get_index_of(&canonical) {
			if on_duplicate == OnDuplicate::Reject {
				return Err(TableError::InvalidSpec(format!(
					"instance already exists for '{kind}' ({canonical})"
				)));
			}
			self.slots.shift_remove_index(existing);
			if existing < index {
				index -= 1;
			}
		}

		self.slots.shift_remove_index(index);
		self.slots
			.shift_insert(index, canonical.clone(), Slot::Resolved(instance));
		tracing::debug!(from = %key, to = %canonical, "deferred plugin re-keyed");
		Ok(canonical)
	}

	/// Resolve every deferred slot in insertion order
	pub fn resolve_all<F>(&mut self, on_duplicate: OnDuplicate, mut build: F) -> TableResult<()>
	where
		F: FnMut(&str, &Options) -> TableResult<Box<T>>,
	{
		let pending: Vec<String> = self
			.slots
			.iter()
			.filter(|(_, slot)| !slot.is_resolved())
			.map(|(key, _)| key.clone())
			.collect();

		for key in pending {
			if self.slots.contains_key(&key) {
				self.resolve(&key, on_duplicate, &mut build)?;
			}
		}
		Ok(())
	}

	/// Live instance under exactly `key`
	pub fn resolved_mut(&mut self, key: &str) -> Option<&mut T> {
		self.slots.get_mut(key).and_then(Slot::as_resolved_mut)
	}

	/// Live instance under exactly `key`
	pub fn resolved(&self, key: &str) -> Option<&T> {
		self.slots.get(key).and_then(Slot::as_resolved)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[derive(Debug, Clone)]
	struct Probe {
		name: String,
	}

	impl Named for Probe {
		fn canonical_name(&self) -> &str {
			&self.name
		}
	}

	fn qualify(kind: &str, _options: &Options) -> TableResult<Box<Probe>> {
		let name = if kind.starts_with("Qualified_") {
			kind.to_string()
		} else {
			format!("Qualified_{kind}")
		};
		Ok(Box::new(Probe { name }))
	}

	#[fixture]
	fn slots() -> SlotMap<Probe> {
		let mut map = SlotMap::new();
		map.insert("First", Slot::deferred("First", Options::new()));
		map.insert("alias", Slot::deferred("Second", Options::new()));
		map.insert("Third", Slot::deferred("Third", Options::new()));
		map
	}

	#[rstest]
	fn test_insert_existing_key_keeps_position(mut slots: SlotMap<Probe>) {
		slots.insert("First", Slot::Resolved(Box::new(Probe { name: "x".into() })));
		assert_eq!(slots.keys().collect::<Vec<_>>(), ["First", "alias", "Third"]);
		assert!(slots.get("First").unwrap().is_resolved());
	}

	#[rstest]
	fn test_resolve_rekeys_in_place(mut slots: SlotMap<Probe>) {
		let key = slots.resolve("alias", OnDuplicate::Replace, qualify).unwrap();
		assert_eq!(key, "alias");

		let key = slots.resolve("Third", OnDuplicate::Replace, qualify).unwrap();
		assert_eq!(key, "Qualified_Third");
		assert_eq!(
			slots.keys().collect::<Vec<_>>(),
			["First", "alias", "Qualified_Third"]
		);
	}

	#[rstest]
	fn test_resolve_all_preserves_order(mut slots: SlotMap<Probe>) {
		slots.resolve_all(OnDuplicate::Replace, qualify).unwrap();
		assert_eq!(
			slots.keys().collect::<Vec<_>>(),
			["Qualified_First", "alias", "Qualified_Third"]
		);
		assert!(slots.iter().all(|(_, slot)| slot.is_resolved()));
		assert_eq!(slots.resolved("alias").unwrap().name, "Qualified_Second");
	}

	#[rstest]
	fn test_duplicate_canonical_replace_drops_other() {
		let mut map: SlotMap<Probe> = SlotMap::new();
		map.insert(
			"Qualified_A",
			Slot::Resolved(Box::new(Probe {
				name: "Qualified_A".into(),
			})),
		);
		map.insert("B", Slot::deferred("B", Options::new()));
		map.insert("A", Slot::deferred("A", Options::new()));

		let key = map.resolve("A", OnDuplicate::Replace, qualify).unwrap();
		assert_eq!(key, "Qualified_A");
		assert_eq!(map.keys().collect::<Vec<_>>(), ["B", "Qualified_A"]);
	}

	#[rstest]
	fn test_duplicate_canonical_reject() {
		let mut map: SlotMap<Probe> = SlotMap::new();
		map.insert(
			"Qualified_A",
			Slot::Resolved(Box::new(Probe {
				name: "Qualified_A".into(),
			})),
		);
		map.insert("A", Slot::deferred("A", Options::new()));

		let err = map.resolve("A", OnDuplicate::Reject, qualify).unwrap_err();
		assert!(matches!(err, TableError::InvalidSpec(_)));
	}

	#[rstest]
	fn test_suffix_lookup_is_case_insensitive_first_match(mut slots: SlotMap<Probe>) {
		slots.insert("Other_Third", Slot::deferred("Other_Third", Options::new()));
		assert_eq!(slots.find_by_suffix("third").as_deref(), Some("Third"));
		assert_eq!(slots.find("alias").as_deref(), Some("alias"));
		assert_eq!(slots.find("IAS").as_deref(), Some("alias"));
		assert_eq!(slots.find("missing"), None);
		assert_eq!(slots.find_by_suffix(""), None);
	}

	#[rstest]
	fn test_remove_and_clear(mut slots: SlotMap<Probe>) {
		assert!(slots.remove("alias").is_some());
		assert_eq!(slots.keys().collect::<Vec<_>>(), ["First", "Third"]);
		assert!(slots.remove("alias").is_none());
		slots.clear();
		assert!(slots.is_empty());
	}
}
