//! Typed field accessors over raw examples.

use serde_json::Value;

use crate::errors::TaskError;
use crate::types::RawExample;

/// Return the value at `field`, failing when the column is absent.
pub fn require<'a>(
    task: &str,
    example: &'a RawExample,
    field: &str,
) -> Result<&'a Value, TaskError> {
    example.get(field).ok_or_else(|| TaskError::MissingField {
        task: task.to_string(),
        field: field.to_string(),
    })
}

/// Return the value at a nested object path such as `answers.text`.
pub fn require_path<'a>(
    task: &str,
    example: &'a RawExample,
    path: &[&str],
) -> Result<&'a Value, TaskError> {
    let missing = || TaskError::MissingField {
        task: task.to_string(),
        field: path.join("."),
    };
    let (first, rest) = path.split_first().ok_or_else(missing)?;
    let mut value = example.get(*first).ok_or_else(missing)?;
    for key in rest {
        value = value.get(*key).ok_or_else(missing)?;
    }
    Ok(value)
}

/// Integer column; integral floats and numeric strings are accepted.
pub fn require_i64(task: &str, example: &RawExample, field: &str) -> Result<i64, TaskError> {
    let value = require(task, example, field)?;
    value_as_i64(value).ok_or_else(|| invalid(task, field, "expected an integer", value))
}

/// String column.
pub fn require_str<'a>(
    task: &str,
    example: &'a RawExample,
    field: &str,
) -> Result<&'a str, TaskError> {
    let value = require(task, example, field)?;
    value
        .as_str()
        .ok_or_else(|| invalid(task, field, "expected a string", value))
}

/// Boolean column; `0`/`1` integers are accepted.
pub fn require_bool(task: &str, example: &RawExample, field: &str) -> Result<bool, TaskError> {
    let value = require(task, example, field)?;
    let flag = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().and_then(|n| match n {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        _ => None,
    };
    flag.ok_or_else(|| invalid(task, field, "expected a boolean", value))
}

/// List-of-strings value.
pub fn str_list(task: &str, field: &str, value: &Value) -> Result<Vec<String>, TaskError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(task, field, "expected a list of strings", value))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(ToString::to_string)
                .ok_or_else(|| invalid(task, field, "expected a list of strings", value))
        })
        .collect()
}

/// Integer column that may be absent or null.
pub fn optional_i64(example: &RawExample, field: &str) -> Option<i64> {
    example.get(field).and_then(value_as_i64)
}

/// Non-empty string column that may be absent or null.
pub fn optional_str<'a>(example: &'a RawExample, field: &str) -> Option<&'a str> {
    example
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn invalid(task: &str, field: &str, expected: &str, value: &Value) -> TaskError {
    TaskError::InvalidField {
        task: task.to_string(),
        field: field.to_string(),
        reason: format!("{expected}, got {value}"),
    }
}
