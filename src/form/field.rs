use serde_json::Value;

use crate::domain::FieldDescriptor;

/// Per-request processing state for one declared field.
///
/// `staged` holds a validated value awaiting persistence; `errors` holds
/// recorded validation messages. A field is never both staged and errored.
#[derive(Debug, Clone)]
pub(crate) struct FieldState {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) staged: Option<Value>,
    pub(crate) errors: Vec<String>,
}

impl FieldState {
    pub(crate) fn new(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            staged: None,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.staged = None;
        self.errors.push(message);
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
