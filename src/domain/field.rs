use regex::Regex;
use serde_json::{Value, json};

/// Value shape a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Integer,
    String,
    Enum(Vec<String>),
    List,
}

/// Constraint checked after a submitted value has been coerced to its kind.
#[derive(Debug, Clone)]
pub enum ValueRule {
    Range { min: Option<i64>, max: Option<i64> },
    Pattern(Regex),
    MaxItems(usize),
    NonEmpty,
}

impl ValueRule {
    pub fn range(min: impl Into<Option<i64>>, max: impl Into<Option<i64>>) -> Self {
        ValueRule::Range {
            min: min.into(),
            max: max.into(),
        }
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            ValueRule::Range { min, max } => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| "expected integer".to_string())?;
                if let Some(min) = min {
                    if number < *min {
                        return Err(format!("value must be at least {min}"));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        return Err(format!("value must be at most {max}"));
                    }
                }
                Ok(())
            }
            ValueRule::Pattern(pattern) => {
                let text = value.as_str().ok_or_else(|| "expected string".to_string())?;
                if pattern.is_match(text) {
                    Ok(())
                } else {
                    Err(format!("value does not match pattern '{}'", pattern.as_str()))
                }
            }
            ValueRule::MaxItems(limit) => {
                let items = value.as_array().ok_or_else(|| "expected list".to_string())?;
                if items.len() > *limit {
                    Err(format!("at most {limit} item(s) allowed"))
                } else {
                    Ok(())
                }
            }
            ValueRule::NonEmpty => {
                let text = value.as_str().ok_or_else(|| "expected string".to_string())?;
                if text.trim().is_empty() {
                    Err("value must not be empty".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Gates a field on a sibling field's effective value.
#[derive(Debug, Clone)]
pub struct FieldDependency {
    pub field: String,
    pub equals: Value,
}

/// One named, typed configuration value with a default and validation rule.
///
/// Descriptors are static declarations: constructed once when a form
/// definition is built and immutable afterwards. The default must satisfy
/// the field's own kind and rule ([`crate::FormDefinition::validate`]
/// checks this).
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub default: Value,
    pub rule: Option<ValueRule>,
    pub depends_on: Option<FieldDependency>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, default: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
            rule: None,
            depends_on: None,
        }
    }

    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, FieldKind::Bool, Value::Bool(default))
    }

    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self::new(name, FieldKind::Integer, json!(default))
    }

    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String, Value::String(default.into()))
    }

    pub fn choice(name: impl Into<String>, options: &[&str], default: &str) -> Self {
        let options = options.iter().map(|option| option.to_string()).collect();
        Self::new(
            name,
            FieldKind::Enum(options),
            Value::String(default.to_string()),
        )
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List, Value::Array(Vec::new()))
    }

    pub fn with_rule(mut self, rule: ValueRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Processes this field only while `field` currently equals `value`.
    pub fn when(mut self, field: impl Into<String>, equals: Value) -> Self {
        self.depends_on = Some(FieldDependency {
            field: field.into(),
            equals,
        });
        self
    }
}
