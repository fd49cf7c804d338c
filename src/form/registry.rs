use anyhow::{Result, bail};
use indexmap::IndexMap;
use serde_json::json;

use crate::domain::{FieldDescriptor, ValueRule, coerce_value};
use crate::store::ConfigHandle;

use super::form::Form;

/// A named, ordered collection of field descriptors: one logical settings
/// group, declared as data.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        debug_assert!(
            !self.fields.iter().any(|f| f.name == descriptor.name),
            "duplicate field '{}' in form '{}'",
            descriptor.name,
            self.name
        );
        self.fields.push(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Qualified `Form/field` store keys, in declaration order.
    pub fn field_keys(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| format!("{}/{}", self.name, field.name))
            .collect()
    }

    /// Check the declaration invariant: every default must satisfy its own
    /// kind and rule.
    pub fn validate(&self) -> Result<()> {
        for field in &self.fields {
            let value = match coerce_value(&field.default, &field.kind) {
                Ok(value) => value,
                Err(message) => bail!(
                    "form '{}', field '{}': default does not fit its kind: {message}",
                    self.name,
                    field.name
                ),
            };
            if let Some(rule) = &field.rule {
                if let Err(message) = rule.check(&value) {
                    bail!(
                        "form '{}', field '{}': default violates its rule: {message}",
                        self.name,
                        field.name
                    );
                }
            }
        }
        Ok(())
    }

    pub(crate) fn instantiate(&self, store: ConfigHandle) -> Form {
        Form::new(self, store)
    }
}

/// Ordered table of form definitions, built once at startup and handed to
/// every [`crate::FormList`] a request constructs.
///
/// Lookups never fail loudly: an unknown name reads back as `None`/`false`
/// and the caller decides how to react.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    entries: IndexMap<String, FormDefinition>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, definition: FormDefinition) -> Self {
        self.entries.insert(definition.name().to_string(), definition);
        self
    }

    /// Registered form names, in registration order.
    pub fn form_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FormDefinition> {
        self.entries.get(name)
    }

    pub(crate) fn definitions(&self) -> impl Iterator<Item = &FormDefinition> {
        self.entries.values()
    }

    /// Union of every registered form's qualified field keys, in
    /// registration order, duplicates retained.
    pub fn fields(&self) -> Vec<String> {
        self.entries
            .values()
            .flat_map(FormDefinition::field_keys)
            .collect()
    }

    /// The standard preference groups of the administration tool.
    pub fn builtin() -> Self {
        Self::new()
            .register(
                FormDefinition::new("Main")
                    .field(FieldDescriptor::bool("show_hints", true))
                    .field(
                        FieldDescriptor::integer("rows_per_page", 25)
                            .with_rule(ValueRule::range(1, 1000)),
                    )
                    .field(FieldDescriptor::choice(
                        "tab_order",
                        &["browse", "structure", "sql"],
                        "browse",
                    )),
            )
            .register(
                FormDefinition::new("Sql")
                    .field(
                        FieldDescriptor::integer("max_rows", 25)
                            .with_rule(ValueRule::range(1, 5000)),
                    )
                    .field(FieldDescriptor::bool("confirm_destructive", true))
                    .field(FieldDescriptor::choice(
                        "grid_editing",
                        &["click", "double-click", "disabled"],
                        "double-click",
                    )),
            )
            .register(
                FormDefinition::new("Navigation")
                    .field(FieldDescriptor::bool("display_logo", true))
                    .field(
                        FieldDescriptor::integer("tree_limit", 250)
                            .with_rule(ValueRule::range(1, 10_000)),
                    )
                    .field(
                        FieldDescriptor::list("hidden_databases")
                            .with_rule(ValueRule::MaxItems(100)),
                    ),
            )
            .register(
                FormDefinition::new("Export")
                    .field(FieldDescriptor::choice(
                        "format",
                        &["sql", "csv", "latex", "xml"],
                        "sql",
                    ))
                    .field(FieldDescriptor::choice(
                        "compression",
                        &["none", "zip", "gzip"],
                        "none",
                    ))
                    .field(
                        FieldDescriptor::bool("lock_tables", false).when("format", json!("sql")),
                    ),
            )
            .register(
                FormDefinition::new("Import")
                    .field(FieldDescriptor::choice("format", &["sql", "csv"], "sql"))
                    .field(FieldDescriptor::bool("allow_interrupt", true))
                    .field(
                        FieldDescriptor::integer("skip_queries", 0)
                            .with_rule(ValueRule::range(0, None)),
                    ),
            )
            .register(
                FormDefinition::new("Features")
                    .field(FieldDescriptor::bool("version_check", true))
                    .field(
                        FieldDescriptor::string("default_charset", "utf-8")
                            .with_rule(ValueRule::NonEmpty),
                    ),
            )
    }
}
