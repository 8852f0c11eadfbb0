//! Rendering strategies and the per-owner decorator chain
//!
//! Each element and table owns a [`DecoratorChain`]. Rendering walks the
//! chain in registration order, handing every decorator the content the
//! previous one returned.

mod chain;
mod elements;
mod frame;
mod view_helper;

pub use chain::{DecoratorChain, DecoratorSpec};
pub use elements::ElementsDecorator;
pub use frame::FrameDecorator;
pub use view_helper::ViewHelperDecorator;

use std::fmt::{self, Debug};

use serde_json::Value;

use crate::content::Content;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::TableResult;
use crate::plugin::Options;
use crate::slot::Named;
use crate::table::DataTable;

/// Kind of object a decorator renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
	/// A single element
	Element,
	/// A whole table
	Table,
}

impl fmt::Display for OwnerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Element => "element",
			Self::Table => "table",
		})
	}
}

/// The object a decorator is bound to for one render call
#[derive(Debug)]
pub enum Owner<'a> {
	/// Element being rendered
	Element(&'a mut Element),
	/// Table being rendered
	Table(&'a mut DataTable),
}

impl Owner<'_> {
	/// Kind of the bound object
	pub fn kind(&self) -> OwnerKind {
		match self {
			Self::Element(_) => OwnerKind::Element,
			Self::Table(_) => OwnerKind::Table,
		}
	}

	/// Name of the bound object
	pub fn name(&self) -> &str {
		match self {
			Self::Element(element) => element.name(),
			Self::Table(table) => table.name(),
		}
	}

	/// Shorter-lived owner over the same object
	pub fn reborrow(&mut self) -> Owner<'_> {
		match self {
			Self::Element(element) => Owner::Element(element),
			Self::Table(table) => Owner::Table(table),
		}
	}

	pub(crate) fn describe(&self) -> String {
		format!("{} '{}'", self.kind(), self.name())
	}
}

/// A rendering strategy
pub trait Decorator: Debug + Send + Sync {
	/// Qualified kind name, e.g. `DataTable_Decorator_ViewHelper`
	fn kind_name(&self) -> &str;

	/// Construction options
	fn options(&self) -> &Options;

	/// Mutable construction options
	fn options_mut(&mut self) -> &mut Options;

	/// Whether the decorator can render `owner`
	fn accepts(&self, owner: OwnerKind) -> bool {
		let _ = owner;
		true
	}

	/// Produce new content from `content` for `owner`
	fn render(&mut self, owner: Owner<'_>, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content>;

	/// Clone into a new box
	fn clone_box(&self) -> Box<dyn Decorator>;

	/// Single option
	fn option(&self, key: &str) -> Option<&Value> {
		self.options().get(key)
	}

	/// Set a single option
	fn set_option(&mut self, key: &str, value: Value) {
		self.options_mut().insert(key.to_string(), value);
	}

	/// Remove a single option, returning it
	fn remove_option(&mut self, key: &str) -> Option<Value> {
		self.options_mut().shift_remove(key)
	}

	/// Remove every option
	fn clear_options(&mut self) {
		self.options_mut().clear();
	}
}

impl Clone for Box<dyn Decorator> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl Named for dyn Decorator {
	fn canonical_name(&self) -> &str {
		self.kind_name()
	}
}
