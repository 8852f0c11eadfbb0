use super::{Decorator, Owner, OwnerKind};
use crate::content::Content;
use crate::context::RenderContext;
use crate::error::{TableError, TableResult};
use crate::plugin::Options;

/// Renders every element of a table in resolved order
///
/// Elements without a translator of their own receive the table's. The
/// cells, column definitions and scripts of each element are appended to
/// the incoming content.
#[derive(Debug, Clone, Default)]
pub struct ElementsDecorator {
	options: Options,
}

impl ElementsDecorator {
	/// Qualified kind name
	pub const KIND: &'static str = "DataTable_Decorator_DataTableElements";

	/// Create from options
	pub fn new(options: Options) -> Self {
		Self { options }
	}
}

impl Decorator for ElementsDecorator {
	fn kind_name(&self) -> &str {
		Self::KIND
	}

	fn options(&self) -> &Options {
		&self.options
	}

	fn options_mut(&mut self) -> &mut Options {
		&mut self.options
	}

	fn accepts(&self, owner: OwnerKind) -> bool {
		owner == OwnerKind::Table
	}

	fn render(&mut self, owner: Owner<'_>, ctx: &RenderContext<'_>, content: Content) -> TableResult<Content> {
		let table = match owner {
			Owner::Table(table) => table,
			other => {
				return Err(TableError::Binding {
					decorator: Self::KIND.to_string(),
					owner: other.describe(),
				});
			}
		};

		let translator = table.translator(ctx);
		let names = table.ordered_names()?;
		let mut content = content;
		for name in names {
			let element = table
				.element_mut(&name)
				.ok_or_else(|| TableError::CorruptIterator(name.clone()))?;
			if !element.has_translator() {
				if let Some(translator) = &translator {
					element.set_translator(Some(translator.clone()));
				}
			}
			content.append(element.render(ctx)?);
		}
		Ok(content)
	}

	fn clone_box(&self) -> Box<dyn Decorator> {
		Box::new(self.clone())
	}
}
