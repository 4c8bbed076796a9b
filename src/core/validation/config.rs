//! Declarative per-field validation
//!
//! A [`ValidationConfig`] lists, per field, the filters applied to the raw
//! value and then the validators checked against the filtered value. Fields
//! that are not configured pass through untouched.

use crate::core::error::FieldValidationError;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type ValidatorFn = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type FilterFn = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Clone, Default)]
struct FieldRules {
    filters: Vec<FilterFn>,
    validators: Vec<ValidatorFn>,
}

/// Filters and validators keyed by field, applied in declaration order
#[derive(Clone, Default)]
pub struct ValidationConfig {
    fields: IndexMap<String, FieldRules>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter to `field`
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.fields
            .entry(field.to_string())
            .or_default()
            .filters
            .push(Arc::new(filter));
        self
    }

    /// Add a validator to `field`
    pub fn validate<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.fields
            .entry(field.to_string())
            .or_default()
            .validators
            .push(Arc::new(validator));
        self
    }

    /// Names of the configured fields, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Filter then validate a JSON object
    ///
    /// Every field is checked; the first failure of each field is reported.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut object) = payload else {
            return Err(vec![FieldValidationError {
                field: "_payload".to_string(),
                message: "expected a JSON object".to_string(),
            }]);
        };

        let mut errors = Vec::new();

        for (field, rules) in &self.fields {
            let raw = object.remove(field).unwrap_or(Value::Null);

            let filtered = rules
                .filters
                .iter()
                .try_fold(raw, |v, filter| filter(field.as_str(), v));
            let value = match filtered {
                Ok(v) => v,
                Err(e) => {
                    errors.push(FieldValidationError {
                        field: field.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(message) = rules
                .validators
                .iter()
                .find_map(|validator| validator(field.as_str(), &value).err())
            {
                errors.push(FieldValidationError {
                    field: field.clone(),
                    message,
                });
                continue;
            }

            object.insert(field.clone(), value);
        }

        if errors.is_empty() {
            Ok(Value::Object(object))
        } else {
            Err(errors)
        }
    }
}
