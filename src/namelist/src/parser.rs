// rayleighrs-namelist/src/parser.rs

//! Line-oriented parser for namelist input files.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! ! comment
//! &group_name
//!    name = value
//!    name = value0,value1,value2   ! trailing comment
//! /
//! ```
//!
//! Comments and whitespace are dropped; they do not survive a round trip.

use crate::error::{NamelistError, Result};
use crate::namelist::{Namelist, Variable};

pub const GROUP_START: char = '&';
pub const GROUP_END: char = '/';
pub const COMMENT: char = '!';

/// What a single (comment-stripped, trimmed, non-empty) line represents.
#[derive(Debug, Clone, PartialEq)]
enum LineKind<'a> {
    GroupStart(&'a str),
    GroupEnd,
    Assignment(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(GROUP_START) {
        LineKind::GroupStart(rest.trim())
    } else if line.starts_with(GROUP_END) {
        LineKind::GroupEnd
    } else {
        LineKind::Assignment(line)
    }
}

/// Parser over a complete input text.
pub struct NamelistParser<'a> {
    input: &'a str,
}

impl<'a> NamelistParser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the input and return a namelist.
    ///
    /// Any structural problem aborts the whole parse.
    pub fn parse(&self) -> Result<Namelist> {
        let mut namelist = Namelist::new();
        // name and line number of the group currently open
        let mut open: Option<(String, usize)> = None;

        for (idx, raw) in self.input.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            match classify(line) {
                LineKind::GroupStart(name) => {
                    if let Some((current, started)) = &open {
                        return Err(NamelistError::structural(
                            line_no,
                            raw,
                            format!(
                                "group '{}' opened at line {} is not terminated",
                                current, started
                            ),
                        ));
                    }
                    validate_group_name(name, line_no, raw)?;

                    let group = namelist.insert_group(name);
                    open = Some((group.name().to_string(), line_no));
                }
                LineKind::GroupEnd => {
                    if open.take().is_none() {
                        return Err(NamelistError::structural(
                            line_no,
                            raw,
                            "group end marker without an open group",
                        ));
                    }
                }
                LineKind::Assignment(text) => {
                    let Some((current, _)) = &open else {
                        return Err(NamelistError::structural(
                            line_no,
                            raw,
                            "assignment outside of a group",
                        ));
                    };
                    let variable = parse_assignment(text, line_no, raw)?;
                    namelist.insert_group(current).insert(variable);
                }
            }
        }

        if let Some((current, started)) = open {
            return Err(NamelistError::structural(
                started,
                format!("{}{}", GROUP_START, current),
                format!("group '{}' is not terminated before end of input", current),
            ));
        }

        Ok(namelist)
    }
}

fn validate_group_name(name: &str, line_no: usize, raw: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NamelistError::structural(line_no, raw, "group name is missing"));
    }
    if name.contains(|c: char| c.is_whitespace() || c == '=' || c == GROUP_END) {
        return Err(NamelistError::structural(
            line_no,
            raw,
            "group name must be alone on its line",
        ));
    }
    Ok(())
}

/// Parse `name = value[,value...]`.
fn parse_assignment(text: &str, line_no: usize, raw: &str) -> Result<Variable> {
    let Some((name, rhs)) = text.split_once('=') else {
        return Err(NamelistError::structural(
            line_no,
            raw,
            "expected `name = value`",
        ));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(NamelistError::structural(
            line_no,
            raw,
            "variable name is missing",
        ));
    }

    let rhs = rhs.trim();
    let values = if rhs.contains(',') {
        split_values(rhs)
    } else {
        vec![rhs.to_string()]
    };

    Ok(Variable::new(name, values))
}

/// Split on commas that are not inside a quoted string, trimming each piece.
fn split_values(rhs: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in rhs.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                values.push(rhs[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    values.push(rhs[start..].trim().to_string());
    values
}

/// Cut a trailing `!` comment that is not inside a quoted string.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, COMMENT) => return &line[..i],
            _ => {}
        }
    }
    line
}
