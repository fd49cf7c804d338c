use indexmap::IndexMap;
use serde_json::Value;

/// Submitted key/value pairs for one request, plus the save marker.
///
/// Keys are qualified `Form/field` paths. The marker is the moral
/// equivalent of a `submit_save` button: when a form is asked to honor it
/// and it is absent, processing is a no-op success.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    values: IndexMap<String, Value>,
    submitted: bool,
}

impl Submission {
    /// An empty submission without the save marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty submission carrying the save marker.
    pub fn submitted() -> Self {
        Self {
            values: IndexMap::new(),
            submitted: true,
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
