//! Validation and filtering system
//!
//! This module provides a declarative approach to validating and filtering
//! form data before it reaches the store, plus the attachment policy for
//! proof-of-purchase files.

pub mod attachment;
pub mod config;
pub mod filters;
pub mod rules;
pub mod validators;

pub use attachment::AttachmentPolicy;
pub use config::ValidationConfig;
pub use rules::bill_form_rules;
