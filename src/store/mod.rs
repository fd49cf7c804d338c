use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

mod file;
mod format;

pub use format::DocumentFormat;

/// Shared handle to the store for one request: every form a
/// [`crate::FormList`] creates writes through the same instance.
pub type ConfigHandle = Rc<RefCell<ConfigFile>>;

/// Ordered key/value configuration store with a defaults layer.
///
/// Keys are qualified `Form/field` paths. `get` falls back to the default
/// layer, so a freshly seeded store answers every declared field even
/// before anything has been saved.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    values: IndexMap<String, Value>,
    defaults: IndexMap<String, Value>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `key`, falling back to its default, then `Null`.
    pub fn get(&self, key: &str) -> Value {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get_default(&self, key: &str) -> Value {
        self.defaults.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn set_default(&mut self, key: impl Into<String>, value: Value) {
        self.defaults.insert(key.into(), value);
    }

    pub fn has_default(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    /// Explicitly saved values only; defaults are not included.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn into_handle(self) -> ConfigHandle {
        Rc::new(RefCell::new(self))
    }
}
