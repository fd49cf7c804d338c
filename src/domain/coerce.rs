use serde_json::Value;

use super::field::FieldKind;

/// Normalize a submitted value to the field's kind.
///
/// Submissions arrive either as typed JSON scalars or as the strings a
/// form post produces, so every kind accepts both spellings. Failures are
/// messages recorded in the owning form's error set, never faults.
pub(crate) fn coerce_value(raw: &Value, kind: &FieldKind) -> Result<Value, String> {
    match kind {
        FieldKind::Bool => bool_value(raw),
        FieldKind::Integer => integer_value(raw),
        FieldKind::String => string_value(raw),
        FieldKind::Enum(options) => enum_value(raw, options),
        FieldKind::List => list_value(raw),
    }
}

fn bool_value(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Bool(flag) => Ok(Value::Bool(*flag)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            // "on" is what an HTML checkbox posts when checked
            "true" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "0" | "" => Ok(Value::Bool(false)),
            other => Err(format!("'{other}' is not a valid boolean")),
        },
        _ => Err("expected boolean".to_string()),
    }
}

fn integer_value(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| "expected integer".to_string()),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("'{trimmed}' is not a valid integer"))
        }
        _ => Err("expected integer".to_string()),
    }
}

fn string_value(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::String(text) => Ok(Value::String(text.clone())),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        _ => Err("expected string".to_string()),
    }
}

fn enum_value(raw: &Value, options: &[String]) -> Result<Value, String> {
    let candidate = match raw {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return Err("expected string".to_string()),
    };
    if options.iter().any(|option| option == &candidate) {
        Ok(Value::String(candidate))
    } else {
        Err(format!(
            "value '{candidate}' is not one of: {}",
            options.join(", ")
        ))
    }
}

fn list_value(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(string_value(item).map_err(|_| "expected list of strings".to_string())?);
            }
            Ok(Value::Array(values))
        }
        // a form post sends lists as one comma-separated text input
        Value::String(text) => {
            let values = text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect();
            Ok(Value::Array(values))
        }
        _ => Err("expected list".to_string()),
    }
}
