// rayleighrs-namelist/src/error.rs

//! Error types for reading, editing and writing namelist files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for namelist operations.
pub type Result<T> = std::result::Result<T, NamelistError>;

/// Errors that can occur when parsing, editing or writing a namelist file.
#[derive(Error, Debug)]
pub enum NamelistError {
    /// I/O error when reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unbalanced group markers or a malformed assignment line
    #[error("Structural error at line {line}: {message} (`{text}`)")]
    Structural {
        line: usize,
        text: String,
        message: String,
    },

    /// Indentation string contains something other than whitespace
    #[error("Indent must only include empty space: indent = \"{indent}\"")]
    FormatConfig { indent: String },

    /// Target file exists and overwriting was not permitted
    #[error("File already exists and overwrite was not permitted: {}", .0.display())]
    WriteConflict(PathBuf),

    /// A variable reached the writer without any value
    #[error("Variable '{variable}' in group '{group}' was not given a value")]
    EmptyValue { group: String, variable: String },

    #[error("Group '{group}' not found")]
    GroupNotFound { group: String },

    #[error("Variable '{variable}' not found in group '{group}'")]
    VariableNotFound { variable: String, group: String },

    /// A value could not be interpreted as the type an operation required
    #[error("Invalid value '{value}' for variable '{variable}'. Expected type: {expected_type}")]
    InvalidValue {
        variable: String,
        value: String,
        expected_type: String,
    },

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NamelistError {
    /// Create a new structural error.
    pub fn structural<S: Into<String>, M: Into<String>>(line: usize, text: S, message: M) -> Self {
        NamelistError::Structural {
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value<S: Into<String>>(variable: S, value: S, expected_type: S) -> Self {
        NamelistError::InvalidValue {
            variable: variable.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        }
    }

    /// Get the error category for logging purposes.
    pub fn category(&self) -> &'static str {
        match self {
            NamelistError::Io(_) => "io",
            NamelistError::Structural { .. } => "structural",
            NamelistError::FormatConfig { .. } => "format",
            NamelistError::WriteConflict(_) => "write_conflict",
            NamelistError::EmptyValue { .. } => "value",
            NamelistError::GroupNotFound { .. } => "not_found",
            NamelistError::VariableNotFound { .. } => "not_found",
            NamelistError::InvalidValue { .. } => "value",
            #[cfg(feature = "json")]
            NamelistError::Json(_) => "json",
            #[cfg(feature = "yaml")]
            NamelistError::Yaml(_) => "yaml",
        }
    }

    /// Line number the error points at, when it came from the parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            NamelistError::Structural { line, .. } => Some(*line),
            _ => None,
        }
    }
}
