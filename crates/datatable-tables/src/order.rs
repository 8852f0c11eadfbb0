//! Ordering engine
//!
//! Resolves a partial order over named items into one deterministic
//! sequence. Items carry an optional integer priority:
//!
//! - an explicit priority claims that exact position; a second item
//!   claiming it is an [`OrderConflict`](crate::error::TableError::OrderConflict),
//! - an unset priority takes the lowest free position from a cursor shared
//!   by the whole pass, skipping every position any explicit priority in
//!   the set asks for (including ones visited later).
//!
//! The resolved sequence is cached until the set is mutated again.
//!
//! ```mermaid
//! graph LR
//!     A[insert / remove / clear] -->|dirty| B[resolve]
//!     B --> C{priority?}
//!     C -->|explicit| D[claim position or conflict]
//!     C -->|unset| E[probe from cursor]
//!     D --> F[sort by position]
//!     E --> F
//!     F --> G[cached sequence]
//! ```

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;

use crate::error::{TableError, TableResult};

/// Priorities of named items and their cached resolution
///
/// # Examples
///
/// ```
/// use datatable_tables::order::Ordering;
///
/// let mut ordering = Ordering::new();
/// ordering.insert("a", Some(2));
/// ordering.insert("b", None);
/// ordering.insert("c", Some(0));
/// ordering.insert("d", None);
///
/// assert_eq!(ordering.resolve().unwrap(), ["c", "b", "a", "d"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ordering {
	priorities: IndexMap<String, Option<i32>>,
	resolved: Vec<String>,
	dirty: bool,
}

impl Ordering {
	/// Create an empty ordering
	pub fn new() -> Self {
		Self::default()
	}

	/// Record the priority of `name`
	///
	/// Re-inserting a known name keeps its visitation slot and only updates
	/// the priority.
	pub fn insert(&mut self, name: impl Into<String>, priority: Option<i32>) {
		self.priorities.insert(name.into(), priority);
		self.dirty = true;
	}

	/// Forget `name`; returns whether it was known
	pub fn remove(&mut self, name: &str) -> bool {
		let removed = self.priorities.shift_remove(name).is_some();
		if removed {
			self.dirty = true;
		}
		removed
	}

	/// Force the next resolution to recompute the sequence
	pub fn touch(&mut self) {
		self.dirty = true;
	}

	/// Forget every item
	pub fn clear(&mut self) {
		self.priorities.clear();
		self.dirty = true;
	}

	/// Whether `name` takes part in the ordering
	pub fn contains(&self, name: &str) -> bool {
		self.priorities.contains_key(name)
	}

	/// Priority recorded for `name`
	pub fn priority(&self, name: &str) -> Option<Option<i32>> {
		self.priorities.get(name).copied()
	}

	/// Number of ordered items
	pub fn len(&self) -> usize {
		self.priorities.len()
	}

	/// Whether no item is ordered
	pub fn is_empty(&self) -> bool {
		self.priorities.is_empty()
	}

	/// Whether the next resolution recomputes the sequence
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Resolve the order, recomputing only after a mutation
	pub fn resolve(&mut self) -> TableResult<&[String]> {
		self.resolve_with(|_| None)
	}

	/// Resolve the order, asking `late` for a priority of items recorded
	/// without one
	///
	/// This lets an owner honour priorities assigned to an item after it was
	/// inserted. Late priorities claim positions exactly like explicit ones,
	/// so the probing cursor skips them too. A recorded priority always wins
	/// over `late`.
	pub fn resolve_with<F>(&mut self, late: F) -> TableResult<&[String]>
	where
		F: Fn(&str) -> Option<i32>,
	{
		if self.dirty {
			self.resolved = self.compute(&late)?;
			self.dirty = false;
			tracing::debug!(items = self.resolved.len(), "element order recomputed");
		}
		Ok(&self.resolved)
	}

	fn compute<F>(&self, late: &F) -> TableResult<Vec<String>>
	where
		F: Fn(&str) -> Option<i32>,
	{
		let effective: Vec<(&str, Option<i32>)> = self
			.priorities
			.iter()
			.map(|(name, priority)| (name.as_str(), priority.or_else(|| late(name))))
			.collect();
		let explicit: HashSet<i32> = effective.iter().filter_map(|(_, priority)| *priority).collect();
		let mut slots: BTreeMap<i32, &str> = BTreeMap::new();
		let mut cursor = 0;

		for (name, priority) in effective {
			let position = match priority {
				Some(position) => position,
				None => {
					while explicit.contains(&cursor) {
						cursor += 1;
					}
					cursor += 1;
					cursor - 1
				}
			};

			match slots.entry(position) {
				Entry::Vacant(slot) => {
					slot.insert(name);
				}
				Entry::Occupied(slot) if *slot.get() != name => {
					return Err(TableError::OrderConflict {
						first: slot.get().to_string(),
						second: name.to_string(),
						position,
					});
				}
				Entry::Occupied(_) => {}
			}
		}

		Ok(slots.into_values().map(str::to_string).collect())
	}
}
