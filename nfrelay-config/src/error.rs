//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found error.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// `output.method` is `udp` but no destination was given.
    #[error("Invalid configuration: output method 'udp' requires output.destination (--out)")]
    MissingDestination,

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Parsing(Box::new(error))
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (section, kind) in errors.errors() {
        if let validator::ValidationErrorsKind::Struct(nested) = kind {
            for (field, errors) in nested.field_errors() {
                for error in errors {
                    let _ = writeln!(output, "  - {}.{}: {}", section, field, describe(error));
                }
            }
        }
    }
    for (field, errors) in errors.field_errors() {
        for error in errors {
            let _ = writeln!(output, "  - {}: {}", field, describe(error));
        }
    }
    output
}

fn describe(error: &validator::ValidationError) -> String {
    match &error.message {
        Some(msg) => msg.to_string(),
        None => error.code.to_string(),
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
