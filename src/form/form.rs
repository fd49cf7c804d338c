use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{FieldDescriptor, FieldKind, coerce_value};
use crate::render::{ErrorRenderer, PlainRenderer};
use crate::store::ConfigHandle;
use crate::submission::Submission;

use super::field::FieldState;
use super::registry::FormDefinition;

/// One named settings group bound to a configuration store for the
/// duration of a request.
///
/// `process` drives every field through validation and staging; accepted
/// values are written to the store, rejected ones are recorded in the
/// error set. The two never overlap for a single field.
#[derive(Debug)]
pub struct Form {
    name: String,
    fields: Vec<FieldState>,
    store: ConfigHandle,
}

impl Form {
    pub(crate) fn new(definition: &FormDefinition, store: ConfigHandle) -> Self {
        Self {
            name: definition.name().to_string(),
            fields: definition
                .fields()
                .iter()
                .cloned()
                .map(FieldState::new)
                .collect(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the submission and persist accepted values.
    ///
    /// With `check_form_submit` set and no save marker on the submission,
    /// nothing happens and the call reports success. Otherwise every field
    /// is examined; when any fails and `allow_partial_save` is off, all
    /// staged values are discarded. With `allow_partial_save` on, valid
    /// fields are persisted anyway but the call still reports failure.
    pub fn process(
        &mut self,
        submission: &Submission,
        allow_partial_save: bool,
        check_form_submit: bool,
    ) -> bool {
        if check_form_submit && !submission.is_submitted() {
            return true;
        }

        for index in 0..self.fields.len() {
            self.fields[index].errors.clear();
            self.fields[index].staged = None;
            if !self.dependency_open(index) {
                continue;
            }

            let key = self.key_for(&self.fields[index].descriptor.name);
            let outcome = match submission.value(&key) {
                Some(raw) => Some(validate(raw, &self.fields[index].descriptor)),
                // an unchecked checkbox is simply absent from the post
                None if self.fields[index].descriptor.kind == FieldKind::Bool
                    && submission.is_submitted() =>
                {
                    Some(Ok(Value::Bool(false)))
                }
                None => None,
            };
            match outcome {
                Some(Ok(value)) => self.fields[index].staged = Some(value),
                Some(Err(message)) => self.fields[index].record_error(message),
                None => {}
            }
        }

        let failed = self.fields.iter().any(FieldState::has_errors);
        if failed && !allow_partial_save {
            for field in &mut self.fields {
                field.staged = None;
            }
            return false;
        }

        let mut store = self.store.borrow_mut();
        for field in &mut self.fields {
            if let Some(value) = field.staged.take() {
                store.set(format!("{}/{}", self.name, field.descriptor.name), value);
            }
        }
        !failed
    }

    /// Reset every errored field to its default in the store, then clear
    /// its error entry. Valid fields are left untouched.
    pub fn fix_errors(&mut self) {
        let mut store = self.store.borrow_mut();
        for field in &mut self.fields {
            if field.errors.is_empty() {
                continue;
            }
            store.set(
                format!("{}/{}", self.name, field.descriptor.name),
                field.descriptor.default.clone(),
            );
            field.errors.clear();
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(FieldState::has_errors)
    }

    /// Field name → recorded messages, in declaration order.
    pub fn error_map(&self) -> IndexMap<String, Vec<String>> {
        self.fields
            .iter()
            .filter(|field| field.has_errors())
            .map(|field| (field.descriptor.name.clone(), field.errors.clone()))
            .collect()
    }

    /// Render the error set with the default plain renderer; empty string
    /// when there is nothing to report.
    pub fn display_errors(&self) -> String {
        self.render_errors(&PlainRenderer)
    }

    pub fn render_errors(&self, renderer: &dyn ErrorRenderer) -> String {
        if !self.has_errors() {
            return String::new();
        }
        renderer.render(&self.name, &self.error_map())
    }

    fn key_for(&self, field_name: &str) -> String {
        format!("{}/{}", self.name, field_name)
    }

    /// A field with a dependency participates only while the sibling's
    /// effective value matches: staged value first, then the store.
    fn dependency_open(&self, index: usize) -> bool {
        let Some(dependency) = &self.fields[index].descriptor.depends_on else {
            return true;
        };
        let sibling = self
            .fields
            .iter()
            .find(|field| field.descriptor.name == dependency.field);
        let effective = match sibling.and_then(|field| field.staged.clone()) {
            Some(staged) => staged,
            None => self.store.borrow().get(&self.key_for(&dependency.field)),
        };
        effective == dependency.equals
    }
}

fn validate(raw: &Value, descriptor: &FieldDescriptor) -> Result<Value, String> {
    let value = coerce_value(raw, &descriptor.kind)?;
    if let Some(rule) = &descriptor.rule {
        rule.check(&value)?;
    }
    Ok(value)
}
