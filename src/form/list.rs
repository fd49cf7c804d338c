use crate::render::{ErrorRenderer, PlainRenderer};
use crate::store::ConfigHandle;
use crate::submission::Submission;

use super::form::Form;
use super::registry::FormRegistry;

/// Request-scoped batch processor: one instantiated [`Form`] per registry
/// entry, all bound to the same store handle.
///
/// Construction also seeds the store's defaults layer from the field
/// descriptors, so `get_default` and `fix_errors` work without a separate
/// defaults document.
pub struct FormList {
    forms: Vec<Form>,
    fields: Vec<String>,
    renderer: Box<dyn ErrorRenderer>,
}

impl FormList {
    pub fn new(registry: &FormRegistry, store: ConfigHandle) -> Self {
        {
            let mut store = store.borrow_mut();
            for definition in registry.definitions() {
                for field in definition.fields() {
                    let key = format!("{}/{}", definition.name(), field.name);
                    if !store.has_default(&key) {
                        store.set_default(key, field.default.clone());
                    }
                }
            }
        }
        let forms = registry
            .definitions()
            .map(|definition| definition.instantiate(store.clone()))
            .collect();
        Self {
            forms,
            fields: registry.fields(),
            renderer: Box::new(PlainRenderer),
        }
    }

    pub fn with_renderer(mut self, renderer: impl ErrorRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Process every owned form in registration order and AND the results.
    ///
    /// Every form is evaluated even after a failure, so one pass collects
    /// the complete error picture.
    pub fn process(
        &mut self,
        submission: &Submission,
        allow_partial_save: bool,
        check_form_submit: bool,
    ) -> bool {
        let mut ret = true;
        for form in &mut self.forms {
            ret &= form.process(submission, allow_partial_save, check_form_submit);
        }
        ret
    }

    /// Concatenated error rendering of every owned form, in registration
    /// order.
    pub fn display_errors(&self) -> String {
        let mut out = String::new();
        for form in &self.forms {
            out.push_str(&form.render_errors(self.renderer.as_ref()));
        }
        out
    }

    pub fn fix_errors(&mut self) {
        for form in &mut self.forms {
            form.fix_errors();
        }
    }

    pub fn has_errors(&self) -> bool {
        self.forms.iter().any(Form::has_errors)
    }

    /// Qualified field keys across every registered form, duplicates
    /// retained.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }
}
