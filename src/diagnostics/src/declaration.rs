// rayleighrs-diagnostics/src/declaration.rs

//! Line classification for the declaration sources.
//!
//! Quantity codes are declared as Fortran named constants:
//!
//! ```text
//! Integer, Parameter :: vort_r = vort_off + 1 ! :tex: $\omega_r$
//! ```
//!
//! and other files are pulled in with `Include 'file.F'`.

use crate::error::DiagnosticsError;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref DECLARATION: Regex =
        Regex::new(r"(?i)^\s*integer\b.*\bparameter\b.*?::(?P<body>.*)$").unwrap();
    static ref INCLUDE_KEYWORD: Regex = Regex::new(r#"(?i)^\s*include(\s|'|"|$)"#).unwrap();
    static ref INCLUDE_TARGET: Regex =
        Regex::new(r#"(?i)^\s*include\s*(?:'(?P<single>[^']+)'|"(?P<double>[^"]+)")"#).unwrap();
}

/// Where a line came from, for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub file: &'a Path,
    /// 1-based line number
    pub line: usize,
    pub text: &'a str,
}

impl<'a> LineContext<'a> {
    pub fn malformed<S: Into<String>>(&self, message: S) -> DiagnosticsError {
        DiagnosticsError::MalformedDeclaration {
            file: self.file.to_path_buf(),
            line: self.line,
            message: message.into(),
            text: self.text.trim().to_string(),
        }
    }

    pub fn unresolved(&self, offset: &str) -> DiagnosticsError {
        DiagnosticsError::OffsetResolution {
            file: self.file.to_path_buf(),
            line: self.line,
            offset: offset.to_string(),
            text: self.text.trim().to_string(),
        }
    }

    pub fn redefined(&self, offset: &str, existing: i64, value: i64) -> DiagnosticsError {
        DiagnosticsError::OffsetRedefinition {
            file: self.file.to_path_buf(),
            line: self.line,
            offset: offset.to_string(),
            existing,
            value,
            text: self.text.trim().to_string(),
        }
    }

    pub fn include_failed<S: Into<String>>(&self, include: &str, reason: S) -> DiagnosticsError {
        DiagnosticsError::IncludeResolution {
            file: self.file.to_path_buf(),
            line: self.line,
            include: include.to_string(),
            reason: reason.into(),
        }
    }
}

/// A declaration before its right-hand side has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    /// Lower-cased constant name
    pub name: String,
    /// Lower-cased right-hand side expression
    pub expr: String,
    /// Trailing comment with its original case, if any
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine {
    /// Blank or comment-only line
    Blank,
    /// Include directive; `None` when no quoted file name could be found
    Include(Option<String>),
    Declaration(RawDeclaration),
    Other,
}

/// Classify one line of a declaration source file.
pub fn classify_line(ctx: &LineContext<'_>) -> Result<SourceLine, DiagnosticsError> {
    let trimmed = ctx.text.trim();
    if trimmed.is_empty() || trimmed.starts_with('!') {
        return Ok(SourceLine::Blank);
    }

    if INCLUDE_KEYWORD.is_match(ctx.text) {
        let target = INCLUDE_TARGET.captures(ctx.text).and_then(|caps| {
            caps.name("single")
                .or_else(|| caps.name("double"))
                .map(|m| m.as_str().trim().to_string())
        });
        return Ok(SourceLine::Include(target));
    }

    let Some(caps) = DECLARATION.captures(ctx.text) else {
        return Ok(SourceLine::Other);
    };
    let body = caps.name("body").map(|m| m.as_str()).unwrap_or_default();

    let (assignment, comment) = match body.split_once('!') {
        Some((assignment, comment)) => (assignment, Some(comment.trim().to_string())),
        None => (body, None),
    };

    let Some((name, expr)) = assignment.split_once('=') else {
        return Err(ctx.malformed("expected `name = value` after `::`"));
    };
    let name = name.trim().to_lowercase();
    let expr = expr.trim().to_lowercase();
    if name.is_empty() || expr.is_empty() {
        return Err(ctx.malformed("empty name or value"));
    }

    Ok(SourceLine::Declaration(RawDeclaration {
        name,
        expr,
        comment: comment.filter(|c| !c.is_empty()),
    }))
}
