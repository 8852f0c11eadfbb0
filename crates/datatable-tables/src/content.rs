//! Structured render output

use std::fmt;

use crate::column::ColumnParams;

/// What a render pass produces
///
/// Element renderers contribute one header cell, one column definition and
/// optionally an initialisation script in which `{main}` stands for the
/// table id and `{main_var}` for the script variable holding the grid. The table frame wraps the cells and adds the grid script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
	/// HTML markup
	pub markup: String,
	/// Column definitions, in render order
	pub columns: Vec<ColumnParams>,
	/// Client scripts to run once the document is ready
	pub scripts: Vec<String>,
}

impl Content {
	/// Empty content
	pub fn new() -> Self {
		Self::default()
	}

	/// Content holding only `markup`
	pub fn from_markup(markup: impl Into<String>) -> Self {
		Self {
			markup: markup.into(),
			..Self::default()
		}
	}

	/// Append the markup, columns and scripts of `other`
	pub fn append(&mut self, other: Content) {
		self.markup.push_str(&other.markup);
		self.columns.extend(other.columns);
		self.scripts.extend(other.scripts);
	}

	/// Whether nothing was produced
	pub fn is_empty(&self) -> bool {
		self.markup.is_empty() && self.columns.is_empty() && self.scripts.is_empty()
	}

	/// Scripts wrapped in a document-ready block
	pub fn script_block(&self) -> Option<String> {
		if self.scripts.is_empty() {
			return None;
		}
		let mut block = String::from(
			"<script type=\"text/javascript\">\n//<![CDATA[\n$(document).ready(function() {\n",
		);
		for script in &self.scripts {
			block.push_str("    ");
			block.push_str(script);
			block.push('\n');
		}
		block.push_str("});\n//]]>\n</script>");
		Some(block)
	}

	/// Markup followed by the script block, if any
	pub fn to_html(&self) -> String {
		match self.script_block() {
			Some(block) => format!("{}\n{}", self.markup, block),
			None => self.markup.clone(),
		}
	}
}

impl fmt::Display for Content {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_html())
	}
}
