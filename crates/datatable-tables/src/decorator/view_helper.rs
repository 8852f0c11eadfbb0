use serde_json::Value;

use super::{Decorator, Owner, OwnerKind};
use crate::content::Content;
use crate::context::RenderContext;
use crate::error::{TableError, TableResult};
use crate::name::ucfirst;
use crate::plugin::Options;

/// Renders an element through the view helper named after it
///
/// The helper is the `helper` option when given, else the element's own
/// helper, else `datatable` followed by the last `_` segment of the
/// element type. Incoming content is replaced.
#[derive(Debug, Clone, Default)]
pub struct ViewHelperDecorator {
	options: Options,
	helper: Option<String>,
}

impl ViewHelperDecorator {
	/// Qualified kind name
	pub const KIND: &'static str = "DataTable_Decorator_ViewHelper";

	/// Create from options
	pub fn new(options: Options) -> Self {
		Self { options, helper: None }
	}

	/// Force the helper name
	pub fn set_helper(&mut self, helper: impl Into<String>) -> &mut Self {
		self.helper = Some(helper.into());
		self
	}

	/// Helper name set on the decorator, if any
	pub fn helper(&self) -> Option<&str> {
		self.helper.as_deref()
	}

	fn take_helper_option(&mut self) {
		if self.helper.is_none() {
			if let Some(Value::String(helper)) = self.options.shift_remove("helper") {
				self.helper = Some(helper);
			}
		}
	}
}

impl Decorator for ViewHelperDecorator {
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
		owner == OwnerKind::Element
	}

	fn render(&mut self, owner: Owner<'_>, ctx: &RenderContext<'_>, _content: Content) -> TableResult<Content> {
		let element = match owner {
			Owner::Element(element) => element,
			other => {
				return Err(TableError::Binding {
					decorator: Self::KIND.to_string(),
					owner: other.describe(),
				});
			}
		};
		let view = ctx
			.view()
			.ok_or_else(|| TableError::ViewUnavailable("ViewHelper".to_string()))?;

		self.take_helper_option();
		let name = match (&self.helper, element.helper()) {
			(Some(helper), _) => helper.clone(),
			(None, Some(helper)) => helper.to_string(),
			(None, None) => {
				let type_name = element.type_name();
				let short = type_name.rsplit('_').next().unwrap_or(type_name);
				format!("datatable{}", ucfirst(short))
			}
		};

		let helper = view
			.element_helper(&name)
			.ok_or_else(|| TableError::UnknownHelper(name.clone()))?;
		tracing::debug!(element = %element.name(), helper = %name, "rendering element through view helper");
		helper.render(element, view, ctx)
	}

	fn clone_box(&self) -> Box<dyn Decorator> {
		Box::new(self.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::element::{Element, ElementKind};
	use crate::view::HtmlView;
	use crate::view::helpers::TextHelper;
	use serde_json::json;

	#[test]
	fn test_requires_view() {
		let mut element = Element::new(ElementKind::Text, "nome").unwrap();
		let mut decorator = ViewHelperDecorator::default();

		let err = decorator
			.render(Owner::Element(&mut element), &RenderContext::new(), Content::new())
			.unwrap_err();

		assert_eq!(
			err.to_string(),
			"ViewHelper decorator cannot render without a registered view object"
		);
	}

	#[test]
	fn test_helper_option_wins() {
		let mut element = Element::new(ElementKind::Hidden, "id").unwrap();
		let mut options = Options::new();
		options.insert("helper".into(), json!("datatableText"));
		let mut decorator = ViewHelperDecorator::new(options);
		let view = HtmlView::new();

		let content = decorator
			.render(
				Owner::Element(&mut element),
				&RenderContext::new().with_view(&view),
				Content::from_markup("dropped"),
			)
			.unwrap();

		assert_eq!(decorator.helper(), Some("datatableText"));
		assert!(decorator.option("helper").is_none());
		assert_eq!(content.columns[0].get("visible"), None);
		assert!(!content.markup.contains("dropped"));
	}

	#[test]
	fn test_custom_kind_derives_helper_from_type() {
		let mut element = Element::new(
			ElementKind::Custom {
				type_name: "App_Element_Rating".to_string(),
				helper: None,
			},
			"stars",
		)
		.unwrap();
		let mut view = HtmlView::new();
		let ctx_view = view.clone();

		let err = ViewHelperDecorator::default()
			.render(
				Owner::Element(&mut element),
				&RenderContext::new().with_view(&ctx_view),
				Content::new(),
			)
			.unwrap_err();
		assert!(matches!(err, TableError::UnknownHelper(ref name) if name == "datatableRating"));

		view.register_element_helper("datatableRating", TextHelper);
		let content = ViewHelperDecorator::default()
			.render(
				Owner::Element(&mut element),
				&RenderContext::new().with_view(&view),
				Content::new(),
			)
			.unwrap();
		assert!(content.markup.starts_with("<th id=\"stars\""));
	}
}
