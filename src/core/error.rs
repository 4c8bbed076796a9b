//! Typed error handling for billed
//!
//! Every operation of the controllers and the store gateway reports failures
//! through [`BilledError`], so callers can match on the category instead of
//! inspecting message strings.
//!
//! # Error Categories
//!
//! - [`StoreError`]: failures reported by the store gateway (list/create/update)
//! - [`ValidationError`]: client-side validation of the form and the attachment
//! - [`SessionError`]: reading or writing the persisted client state
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RenderError`]: template rendering
//! - [`NavigationError`]: unknown routes
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.load().await {
//!     Ok(bills) => render(bills),
//!     Err(BilledError::Store(e)) => render_error(e.message()),
//!     Err(e) => tracing::error!(error = %e, "unexpected failure"),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for billed
#[derive(Debug)]
pub enum BilledError {
    /// Store gateway errors
    Store(StoreError),

    /// Validation errors
    Validation(ValidationError),

    /// Persisted client state errors
    Session(SessionError),

    /// Configuration errors
    Config(ConfigError),

    /// Template rendering errors
    Render(RenderError),

    /// Routing errors
    Navigation(NavigationError),

    /// Internal errors (poisoned locks and the like)
    Internal(String),
}

impl fmt::Display for BilledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BilledError::Store(e) => write!(f, "{}", e),
            BilledError::Validation(e) => write!(f, "{}", e),
            BilledError::Session(e) => write!(f, "{}", e),
            BilledError::Config(e) => write!(f, "{}", e),
            BilledError::Render(e) => write!(f, "{}", e),
            BilledError::Navigation(e) => write!(f, "{}", e),
            BilledError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BilledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BilledError::Store(e) => Some(e),
            BilledError::Validation(e) => Some(e),
            BilledError::Session(e) => Some(e),
            BilledError::Config(e) => Some(e),
            BilledError::Render(e) => Some(e),
            BilledError::Navigation(e) => Some(e),
            BilledError::Internal(_) => None,
        }
    }
}

impl BilledError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BilledError::Store(e) => e.error_code(),
            BilledError::Validation(e) => e.error_code(),
            BilledError::Session(e) => e.error_code(),
            BilledError::Config(_) => "CONFIG_ERROR",
            BilledError::Render(_) => "RENDER_ERROR",
            BilledError::Navigation(_) => "UNKNOWN_ROUTE",
            BilledError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the user when this error reaches a view
    ///
    /// Store errors are shown verbatim ("Erreur 404"), everything else uses
    /// the `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            BilledError::Store(e) => e.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Shorthand for a poisoned lock or similar internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        BilledError::Internal(message.into())
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors reported by the store gateway
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend answered with an error status ("Erreur 404", "Erreur 500")
    Status { code: u16, message: String },

    /// The bill targeted by an update does not exist
    NotFound { id: String },

    /// The backend failed without a status code
    Backend { message: String },

    /// No store was configured for the controller
    Unavailable,
}

impl StoreError {
    /// Build a status error with the conventional "Erreur <code>" message
    pub fn status(code: u16) -> Self {
        StoreError::Status {
            code,
            message: format!("Erreur {}", code),
        }
    }

    /// Build a backend error from any message
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }

    /// The message carried by the failure, as the view renders it
    pub fn message(&self) -> &str {
        match self {
            StoreError::Status { message, .. } | StoreError::Backend { message } => message,
            StoreError::NotFound { .. } => "Erreur 404",
            StoreError::Unavailable => "Store unavailable",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Status { .. } => "STORE_STATUS",
            StoreError::NotFound { .. } => "BILL_NOT_FOUND",
            StoreError::Backend { .. } => "STORE_BACKEND",
            StoreError::Unavailable => "STORE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Status { message, .. } | StoreError::Backend { message } => {
                write!(f, "{}", message)
            }
            StoreError::NotFound { id } => write!(f, "Bill with id '{}' not found", id),
            StoreError::Unavailable => write!(f, "No store configured"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for BilledError {
    fn from(err: StoreError) -> Self {
        BilledError::Store(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to client-side validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field validation errors, one per rejected field
    FieldErrors(Vec<FieldValidationError>),

    /// The selected proof-of-purchase file has a rejected extension
    UnsupportedFile { file_name: String, message: String },

    /// Submission attempted without an accepted attachment
    MissingAttachment,

    /// A clicked element lacks the attribute the handler reads
    MissingAttribute { attribute: String },

    /// Invalid JSON shape
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::UnsupportedFile { message, .. } => write!(f, "{}", message),
            ValidationError::MissingAttachment => {
                write!(f, "A proof of purchase must be attached before submitting")
            }
            ValidationError::MissingAttribute { attribute } => {
                write!(f, "Missing attribute '{}' on target element", attribute)
            }
            ValidationError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::UnsupportedFile { .. } => "UNSUPPORTED_FILE",
            ValidationError::MissingAttachment => "MISSING_ATTACHMENT",
            ValidationError::MissingAttribute { .. } => "MISSING_ATTRIBUTE",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<ValidationError> for BilledError {
    fn from(err: ValidationError) -> Self {
        BilledError::Validation(err)
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors related to the persisted client state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The `user` record could not be decoded
    InvalidUser { message: String },

    /// The backing file could not be read or written
    Io { path: String, message: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidUser { message } => {
                write!(f, "Invalid user record: {}", message)
            }
            SessionError::Io { path, message } => {
                write!(f, "Local storage '{}' failed: {}", path, message)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::InvalidUser { .. } => "INVALID_USER",
            SessionError::Io { .. } => "LOCAL_STORAGE_IO",
        }
    }
}

impl From<SessionError> for BilledError {
    fn from(err: SessionError) -> Self {
        BilledError::Session(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for BilledError {
    fn from(err: ConfigError) -> Self {
        BilledError::Config(err)
    }
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors raised while turning view state into markup
#[derive(Debug, Clone, PartialEq)]
pub struct RenderError {
    pub template: String,
    pub message: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to render template '{}': {}",
            self.template, self.message
        )
    }
}

impl std::error::Error for RenderError {}

impl From<RenderError> for BilledError {
    fn from(err: RenderError) -> Self {
        BilledError::Render(err)
    }
}

// =============================================================================
// Navigation Errors
// =============================================================================

/// Errors related to routing
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// The path does not match any known route
    UnknownRoute { path: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::UnknownRoute { path } => write!(f, "Unknown route: {}", path),
        }
    }
}

impl std::error::Error for NavigationError {}

impl From<NavigationError> for BilledError {
    fn from(err: NavigationError) -> Self {
        BilledError::Navigation(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BilledError {
    fn from(err: serde_json::Error) -> Self {
        BilledError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for BilledError {
    fn from(err: serde_yaml::Error) -> Self {
        BilledError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for BilledError {
    fn from(err: std::io::Error) -> Self {
        BilledError::Session(SessionError::Io {
            path: String::new(),
            message: err.to_string(),
        })
    }
}

impl From<tera::Error> for BilledError {
    fn from(err: tera::Error) -> Self {
        BilledError::Render(RenderError {
            template: String::new(),
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error (configuration loading, filters)
impl From<anyhow::Error> for BilledError {
    fn from(err: anyhow::Error) -> Self {
        BilledError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for billed operations
pub type BilledResult<T> = Result<T, BilledError>;

// =============================================================================
// Tests
// =============================================================================
