//! Built-in transformers between JSON primitives and the primitive property types.

use serde_json::Value;

use super::TransformerRegistry;
use crate::error::TransformError;
use crate::value::RawKind;

pub fn install(registry: &mut TransformerRegistry) {
    registry
        .register(RawKind::Number, string_from_number)
        .register(RawKind::String, int_from_string)
        .register(RawKind::String, float_from_string)
        .register(RawKind::String, bool_from_string)
        .register(RawKind::Number, bool_from_number);
}

fn string_from_number(raw: &Value) -> Result<String, TransformError> {
    match raw {
        Value::Number(n) => Ok(n.to_string()),
        other => Err(TransformError::invalid("String", other.to_string(), "not a number")),
    }
}

fn int_from_string(raw: &Value) -> Result<i64, TransformError> {
    let s = expect_str(raw, "i64")?;
    s.trim()
        .parse::<i64>()
        .map_err(|e| TransformError::invalid("i64", raw.to_string(), e.to_string()))
}

fn float_from_string(raw: &Value) -> Result<f64, TransformError> {
    let s = expect_str(raw, "f64")?;
    match s.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(_) => Err(TransformError::invalid("f64", raw.to_string(), "not finite")),
        Err(e) => Err(TransformError::invalid("f64", raw.to_string(), e.to_string())),
    }
}

fn bool_from_string(raw: &Value) -> Result<bool, TransformError> {
    let s = expect_str(raw, "bool")?;
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(TransformError::invalid("bool", raw.to_string(), "not a boolean word")),
    }
}

fn bool_from_number(raw: &Value) -> Result<bool, TransformError> {
    raw.as_f64()
        .map(|n| n != 0.0)
        .ok_or_else(|| TransformError::invalid("bool", raw.to_string(), "not a number"))
}

fn expect_str<'a>(raw: &'a Value, target: &'static str) -> Result<&'a str, TransformError> {
    raw.as_str()
        .ok_or_else(|| TransformError::invalid(target, raw.to_string(), "not a string"))
}
