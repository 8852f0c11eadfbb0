//! Collaborators threaded through a render pass

use datatable_i18n::{SharedTranslator, default_translator};

use crate::view::View;

/// View and fallback translator for one render pass
///
/// A render without a view still works up to the first decorator that
/// needs one; the table frame then passes its content through unchanged.
///
/// # Examples
///
/// ```
/// use datatable_tables::context::RenderContext;
/// use datatable_tables::view::HtmlView;
///
/// let view = HtmlView::new();
/// let ctx = RenderContext::new().with_view(&view);
/// assert!(ctx.view().is_some());
/// assert!(RenderContext::new().view().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderContext<'a> {
	view: Option<&'a dyn View>,
	default_translator: Option<SharedTranslator>,
}

impl<'a> RenderContext<'a> {
	/// Context without a view or translator
	pub fn new() -> Self {
		Self::default()
	}

	/// Render through `view`
	pub fn with_view(mut self, view: &'a dyn View) -> Self {
		self.view = Some(view);
		self
	}

	/// Translator used by owners that have none of their own
	pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
		self.default_translator = Some(translator);
		self
	}

	/// Use the process-wide default translator, if one is registered
	pub fn with_global_translator(mut self) -> Self {
		self.default_translator = default_translator();
		self
	}

	/// View of this pass
	pub fn view(&self) -> Option<&'a dyn View> {
		self.view
	}

	/// Fallback translator of this pass
	pub fn default_translator(&self) -> Option<&SharedTranslator> {
		self.default_translator.as_ref()
	}
}
