//! Reusable field filters
//!
//! These filters transform raw form values before validation

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: turn an empty string into null
///
/// Form inputs always yield strings; an untouched input means "no value".
pub fn empty_as_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_str() {
        Some(s) if s.trim().is_empty() => Ok(Value::Null),
        _ => Ok(value),
    }
}

/// Filter: parse a numeric string into a JSON number
///
/// Accepts a comma as decimal separator.
pub fn parse_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |field: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let normalized = s.trim().replace(',', ".");
        let num: f64 = normalized
            .parse()
            .map_err(|_| anyhow!("'{}' doit être un nombre (valeur: {})", field, s))?;
        if !num.is_finite() {
            return Err(anyhow!("'{}' doit être un nombre fini (valeur: {})", field, s));
        }
        Ok(json!(num))
    }
}

/// Filter: round number to specified decimal places
pub fn round_decimals(
    decimals: u32,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| {
        if let Some(num) = value.as_f64() {
            let factor = 10_f64.powi(decimals as i32);
            let rounded = (num * factor).round() / factor;
            Ok(json!(rounded))
        } else {
            Ok(value)
        }
    }
}

/// Filter: replace null with a default value
pub fn default_value(default: Value) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| {
        if value.is_null() {
            Ok(default.clone())
        } else {
            Ok(value)
        }
    }
}
