//! Proof-of-purchase file acceptance

use crate::core::error::{ConfigError, ValidationError};
use regex::Regex;

/// Decides which picked files may be attached to a bill
#[derive(Debug, Clone)]
pub struct AttachmentPolicy {
    pattern: Regex,
    warning: String,
}

impl AttachmentPolicy {
    /// Build a policy accepting the given extensions (without dot, any case)
    pub fn new(extensions: &[String], warning: impl Into<String>) -> Result<Self, ConfigError> {
        if extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "attachments.allowed_extensions".to_string(),
                value: "[]".to_string(),
                message: "at least one extension is required".to_string(),
            });
        }

        let alternatives: Vec<String> = extensions
            .iter()
            .map(|ext| regex::escape(ext.trim_start_matches('.')))
            .collect();
        let pattern = Regex::new(&format!(r"(?i)\.(?:{})$", alternatives.join("|"))).map_err(
            |e| ConfigError::InvalidValue {
                field: "attachments.allowed_extensions".to_string(),
                value: extensions.join(","),
                message: e.to_string(),
            },
        )?;

        Ok(Self {
            pattern,
            warning: warning.into(),
        })
    }

    /// Warning shown when a file is rejected
    pub fn warning(&self) -> &str {
        &self.warning
    }

    /// Whether `file_name` carries an accepted extension
    pub fn accepts(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name.trim())
    }

    /// Check `file_name`, producing the user-facing warning on rejection
    pub fn check(&self, file_name: &str) -> Result<(), ValidationError> {
        if self.accepts(file_name) {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedFile {
                file_name: file_name.to_string(),
                message: self.warning.clone(),
            })
        }
    }
}
