//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::validation::AttachmentPolicy;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Warning shown when a proof of purchase has a rejected extension
pub const DEFAULT_FILE_WARNING: &str =
    "Merci de transmettre un justificatif étant au format .jpg, .jpeg ou .png";

/// Accepted proof-of-purchase files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Extensions without dot, compared case-insensitively
    pub allowed_extensions: Vec<String>,

    /// Warning shown on rejection
    pub warning_message: String,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            warning_message: DEFAULT_FILE_WARNING.to_string(),
        }
    }
}

/// Bill list and form settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillsConfig {
    /// Categories offered by the form's select
    pub expense_types: Vec<String>,

    /// Percentage used when the form leaves `pct` empty
    pub default_pct: u32,

    /// Only list the bills of the connected user's email
    pub scope_to_user: bool,
}

impl Default for BillsConfig {
    fn default() -> Self {
        Self {
            expense_types: [
                "Transports",
                "Restaurants et bars",
                "Hôtel et logement",
                "Services en ligne",
                "IT et électronique",
                "Equipement et matériel",
                "Fournitures de bureau",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_pct: 20,
            scope_to_user: true,
        }
    }
}

/// Proof-of-purchase preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Width of the modal region in pixels; the image takes half of it
    pub width: u32,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self { width: 800 }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub attachments: AttachmentsConfig,
    pub bills: BillsConfig,
    pub modal: ModalConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = Regex::new(r"^\.?[A-Za-z0-9]+$").map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        if let Some(bad) = self
            .attachments
            .allowed_extensions
            .iter()
            .find(|ext| !extension.is_match(ext))
        {
            return Err(ConfigError::InvalidValue {
                field: "attachments.allowed_extensions".to_string(),
                value: bad.clone(),
                message: "extensions must be alphanumeric".to_string(),
            });
        }

        if self.bills.expense_types.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bills.expense_types".to_string(),
                value: "[]".to_string(),
                message: "at least one expense type is required".to_string(),
            });
        }

        if self.bills.default_pct > 100 {
            return Err(ConfigError::InvalidValue {
                field: "bills.default_pct".to_string(),
                value: self.bills.default_pct.to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }

        if self.modal.width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "modal.width".to_string(),
                value: "0".to_string(),
                message: "must be positive".to_string(),
            });
        }

        // Builds the extension regex, so an empty list fails here too
        self.attachment_policy()?;
        Ok(())
    }

    /// File acceptance policy described by the attachments section
    pub fn attachment_policy(&self) -> Result<AttachmentPolicy, ConfigError> {
        AttachmentPolicy::new(
            &self.attachments.allowed_extensions,
            self.attachments.warning_message.clone(),
        )
    }

    /// Width given to the proof image inside the modal
    pub fn modal_image_width(&self) -> u32 {
        self.modal.width / 2
    }
}
