// rayleighrs-diagnostics/src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiagnosticsError>;

/// Errors raised while mining the diagnostics sources.
///
/// Every parse error names the file, the 1-based line and the offending
/// line text.
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}:{line}: offset '{offset}' is used before it is defined (`{text}`)", .file.display())]
    OffsetResolution {
        file: PathBuf,
        line: usize,
        offset: String,
        text: String,
    },

    #[error("{}:{line}: offset '{offset}' redefined as {value}, already {existing} (`{text}`)", .file.display())]
    OffsetRedefinition {
        file: PathBuf,
        line: usize,
        offset: String,
        existing: i64,
        value: i64,
        text: String,
    },

    #[error("{}:{line}: malformed declaration: {message} (`{text}`)", .file.display())]
    MalformedDeclaration {
        file: PathBuf,
        line: usize,
        message: String,
        text: String,
    },

    #[error("{}:{line}: cannot include '{include}': {reason}", .file.display())]
    IncludeResolution {
        file: PathBuf,
        line: usize,
        include: String,
        reason: String,
    },

    #[error("Failed to render formula for quantity {code}: {message}")]
    Render { code: i64, message: String },
}

impl DiagnosticsError {
    /// Get the error category for logging purposes.
    pub fn category(&self) -> &'static str {
        match self {
            DiagnosticsError::Io(_) => "io",
            DiagnosticsError::OffsetResolution { .. }
            | DiagnosticsError::OffsetRedefinition { .. } => "offset",
            DiagnosticsError::MalformedDeclaration { .. } => "declaration",
            DiagnosticsError::IncludeResolution { .. } => "include",
            DiagnosticsError::Render { .. } => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiagnosticsError::OffsetResolution {
            file: PathBuf::from("Diagnostics_Base.F90"),
            line: 12,
            offset: "vort_off".to_string(),
            text: "Integer, Parameter :: vort_r = vort_off + 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Diagnostics_Base.F90:12: offset 'vort_off' is used before it is defined \
             (`Integer, Parameter :: vort_r = vort_off + 1`)"
        );
        assert_eq!(err.category(), "offset");

        let err = DiagnosticsError::OffsetRedefinition {
            file: PathBuf::from("Diagnostics_Base.F90"),
            line: 20,
            offset: "vort_off".to_string(),
            existing: 100,
            value: 200,
            text: "Integer, Parameter :: vort_off = 200".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Diagnostics_Base.F90:20: offset 'vort_off' redefined as 200, already 100 \
             (`Integer, Parameter :: vort_off = 200`)"
        );
        assert_eq!(err.category(), "offset");

        let err = DiagnosticsError::IncludeResolution {
            file: PathBuf::from("Diagnostics_Base.F90"),
            line: 3,
            include: "missing.F".to_string(),
            reason: "file does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Diagnostics_Base.F90:3: cannot include 'missing.F': file does not exist"
        );
    }
}
