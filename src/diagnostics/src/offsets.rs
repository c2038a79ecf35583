// rayleighrs-diagnostics/src/offsets.rs

use crate::declaration::LineContext;
use crate::error::Result;
use linked_hash_map::LinkedHashMap;

/// Substring that marks a declared name as an offset.
pub const OFFSET_MARKER: &str = "off";

/// Offsets seen so far while scanning declarations, in definition order.
///
/// The table only lives for the duration of one catalog build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetTable {
    offsets: LinkedHashMap<String, i64>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_offset_name(name: &str) -> bool {
        name.to_lowercase().contains(OFFSET_MARKER)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.offsets.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.offsets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Record an offset. Returns whether `name` was newly recorded.
    ///
    /// Repeating a definition with the same value is a no-op; a different
    /// value is an `OffsetRedefinition` error.
    pub fn define(&mut self, name: &str, value: i64, ctx: &LineContext<'_>) -> Result<bool> {
        let key = name.to_lowercase();
        match self.offsets.get(&key) {
            Some(&existing) if existing == value => Ok(false),
            Some(&existing) => Err(ctx.redefined(&key, existing, value)),
            None => {
                log::trace!("offset {} = {}", key, value);
                self.offsets.insert(key, value);
                Ok(true)
            }
        }
    }

    /// Resolve the integer value of the declaration `name = expr`.
    ///
    /// - a plain literal is taken as is
    /// - an expression mentioning an offset must read `<offset> + <integer>`
    ///
    /// If `name` is itself an offset the result is recorded in the table.
    pub fn resolve(&mut self, name: &str, expr: &str, ctx: &LineContext<'_>) -> Result<i64> {
        let expr = expr.trim();
        let value = if expr.to_lowercase().contains(OFFSET_MARKER) {
            let (base, increment) = split_relative(expr, ctx)?;
            let base_value = self.get(base).ok_or_else(|| ctx.unresolved(base))?;
            base_value
                .checked_add(increment)
                .ok_or_else(|| ctx.malformed("quantity code overflows"))?
        } else {
            parse_integer(expr, ctx)?
        };

        if Self::is_offset_name(name) {
            self.define(name, value, ctx)?;
        }
        Ok(value)
    }
}

fn split_relative<'e>(expr: &'e str, ctx: &LineContext<'_>) -> Result<(&'e str, i64)> {
    let Some((base, increment)) = expr.split_once('+') else {
        return Err(ctx.malformed(format!("expected `<offset> + <integer>`, found `{}`", expr)));
    };
    let base = base.trim();
    if base.is_empty() {
        return Err(ctx.malformed("offset name is missing"));
    }
    Ok((base, parse_integer(increment, ctx)?))
}

fn parse_integer(text: &str, ctx: &LineContext<'_>) -> Result<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .map_err(|_| ctx.malformed(format!("`{}` is not an integer literal", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticsError;
    use std::path::Path;

    fn ctx(text: &str) -> LineContext<'_> {
        LineContext {
            file: Path::new("Diagnostics_Base.F90"),
            line: 7,
            text,
        }
    }

    #[test]
    fn test_literal_and_relative() {
        let mut table = OffsetTable::new();
        assert_eq!(table.resolve("offa", "10", &ctx("")).unwrap(), 10);
        assert_eq!(table.resolve("qx", "offa+5", &ctx("")).unwrap(), 15);
        assert_eq!(table.resolve("offb", "offA + 100", &ctx("")).unwrap(), 110);
        assert_eq!(table.resolve("qy", "offb + 1", &ctx("")).unwrap(), 111);

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("offa", 10), ("offb", 110)]);
    }

    #[test]
    fn test_plain_quantities_are_not_recorded() {
        let mut table = OffsetTable::new();
        table.resolve("v_r", "1", &ctx("")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_undefined_offset() {
        let mut table = OffsetTable::new();
        let err = table
            .resolve("qz", "missing_off + 1", &ctx("Integer, Parameter :: qz = missing_off + 1"))
            .unwrap_err();
        match err {
            DiagnosticsError::OffsetResolution { line, offset, .. } => {
                assert_eq!(line, 7);
                assert_eq!(offset, "missing_off");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_redefinition() {
        let mut table = OffsetTable::new();
        assert!(table.define("offa", 10, &ctx("")).unwrap());
        assert!(!table.define("OffA", 10, &ctx("")).unwrap());
        assert_eq!(table.len(), 1);

        let err = table
            .resolve("offa", "20", &ctx("Integer, Parameter :: offa = 20"))
            .unwrap_err();
        match err {
            DiagnosticsError::OffsetRedefinition {
                line,
                offset,
                existing,
                value,
                text,
                ..
            } => {
                assert_eq!(line, 7);
                assert_eq!(offset, "offa");
                assert_eq!((existing, value), (10, 20));
                assert_eq!(text, "Integer, Parameter :: offa = 20");
            }
            other => panic!("unexpected error: {other}"),
        }

        // the table keeps the first value
        assert_eq!(table.get("OFFA"), Some(10));
        assert_eq!(table.resolve("q", "offa + 1", &ctx("")).unwrap(), 11);
    }

    #[test]
    fn test_malformed_expressions() {
        let mut table = OffsetTable::new();
        table.define("offa", 10, &ctx("")).unwrap();

        for expr in ["offa", "offa - 1", "offa + x", "+ 3 off", "1.5", "two"] {
            let err = table.resolve("q", expr, &ctx("")).unwrap_err();
            assert!(
                matches!(
                    err,
                    DiagnosticsError::MalformedDeclaration { .. }
                        | DiagnosticsError::OffsetResolution { .. }
                ),
                "{expr}: {err}"
            );
        }
    }
}
