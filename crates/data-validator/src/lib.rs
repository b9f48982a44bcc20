//! Input Validation
//!
//! Enforces the form's input constraints before a row is assembled.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, ValidationWarning, Validator};
