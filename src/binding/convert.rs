//! String → JSON conversion for declared parameter types.
//!
//! Unlike a lenient decoder that falls back to a string when a value does not
//! parse, every failure here is reported: a handler declaring `u8` must never
//! see `"300"` or `null`.

use super::ParamType;
use crate::error::BindingError;
use serde_json::{Number, Value};

fn parse_int<T>(parameter: &str, raw: &str, target: &'static str) -> Result<Value, BindingError>
where
    T: std::str::FromStr + Into<Value>,
{
    raw.trim()
        .parse::<T>()
        .map(Into::into)
        .map_err(|_| BindingError::conversion(parameter, raw, target))
}

fn parse_float(parameter: &str, raw: &str, target: &'static str) -> Result<Value, BindingError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| BindingError::conversion(parameter, raw, target))
}

fn parse_bool(parameter: &str, raw: &str) -> Result<Value, BindingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Value::Bool(true)),
        "false" | "0" => Ok(Value::Bool(false)),
        _ => Err(BindingError::conversion(parameter, raw, "bool")),
    }
}

/// Convert a raw request string into the JSON form of `ty`
///
/// # Errors
///
/// Returns a conversion error if `raw` does not parse as `ty`, and an
/// unsupported-type error for [`ParamType::Unsupported`].
pub fn convert_str(parameter: &str, raw: &str, ty: &ParamType) -> Result<Value, BindingError> {
    match ty {
        ParamType::Bool => parse_bool(parameter, raw),
        ParamType::I8 => parse_int::<i8>(parameter, raw, "i8"),
        ParamType::I16 => parse_int::<i16>(parameter, raw, "i16"),
        ParamType::I32 => parse_int::<i32>(parameter, raw, "i32"),
        ParamType::I64 => parse_int::<i64>(parameter, raw, "i64"),
        ParamType::U8 => parse_int::<u8>(parameter, raw, "u8"),
        ParamType::U16 => parse_int::<u16>(parameter, raw, "u16"),
        ParamType::U32 => parse_int::<u32>(parameter, raw, "u32"),
        ParamType::U64 => parse_int::<u64>(parameter, raw, "u64"),
        ParamType::F32 => {
            let value = parse_float(parameter, raw, "f32")?;
            match value.as_f64() {
                Some(f) if f.abs() <= f64::from(f32::MAX) => Ok(value),
                _ => Err(BindingError::conversion(parameter, raw, "f32")),
            }
        }
        ParamType::F64 => parse_float(parameter, raw, "f64"),
        ParamType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::String(c.to_string())),
                _ => Err(BindingError::conversion(parameter, raw, "char")),
            }
        }
        ParamType::String => Ok(Value::String(raw.to_string())),
        ParamType::Json => serde_json::from_str::<Value>(raw)
            .or_else(|_| Ok(Value::String(raw.to_string()))),
        ParamType::Unsupported(name) => Err(BindingError::unsupported(parameter, *name)),
    }
}

/// Check that an already-decoded JSON value fits `ty`
///
/// Used for request bodies: `{"id": 1}` bound to a `Json` parameter passes
/// through, `[1]` bound to `I64` does not. Strings are converted for scalar
/// types, so `"42"` bound to `I64` yields `42`.
///
/// # Errors
///
/// Returns a conversion error when the shape does not match `ty`
pub fn check_value(parameter: &str, value: Value, ty: &ParamType) -> Result<Value, BindingError> {
    match (ty, &value) {
        (ParamType::Json, _) => Ok(value),
        (ParamType::Unsupported(name), _) => Err(BindingError::unsupported(parameter, *name)),
        (ParamType::String, Value::String(_)) => Ok(value),
        (ParamType::String, other) => Ok(Value::String(other.to_string())),
        (ParamType::Bool, Value::Bool(_)) => Ok(value),
        (_, Value::String(raw)) => convert_str(parameter, raw, ty),
        (_, Value::Number(n)) if ty.is_numeric() => convert_str(parameter, &n.to_string(), ty),
        (_, other) => Err(BindingError::conversion(
            parameter,
            &other.to_string(),
            ty.name(),
        )),
    }
}
