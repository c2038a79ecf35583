// rayleighrs-namelist/src/namelist/validation.rs

//! Checks run before anything is written.

use super::group::NamelistGroup;
use crate::error::{NamelistError, Result};
use crate::parser::{COMMENT, GROUP_END, GROUP_START};

/// The indentation string may only contain whitespace.
pub fn validate_indent(indent: &str) -> Result<()> {
    if !indent.chars().all(char::is_whitespace) {
        return Err(NamelistError::FormatConfig {
            indent: indent.to_string(),
        });
    }
    Ok(())
}

/// Check that a group can be written and read back unchanged.
///
/// - the group name is non-empty, with no whitespace, `/`, `=` or `!`
/// - every variable has a name free of `=`, `!`, `,` and quotes, not
///   starting with `&` or `/`
/// - every variable has at least one value
/// - values have balanced quotes, no surrounding whitespace or line breaks,
///   and use `!` or `,` only inside quotes
pub fn validate_group(group: &NamelistGroup) -> Result<()> {
    let name = group.name();
    if name.is_empty()
        || name.contains(|c: char| c.is_whitespace() || matches!(c, GROUP_END | '=' | COMMENT))
    {
        return Err(NamelistError::invalid_value(
            "group name",
            name,
            "non-empty name without whitespace, '/', '=' or '!'",
        ));
    }

    for variable in group.variables() {
        let var_name = variable.name();
        if var_name.is_empty() {
            return Err(NamelistError::invalid_value(
                format!("{}%<unnamed>", name),
                variable.joined_values(),
                "named variable".to_string(),
            ));
        }
        if var_name.starts_with([GROUP_START, GROUP_END])
            || var_name.contains(|c: char| {
                matches!(c, '=' | COMMENT | ',' | '\'' | '"' | '\n' | '\r')
            })
        {
            return Err(NamelistError::invalid_value(
                format!("{}%{}", name, var_name),
                var_name.to_string(),
                "variable name without '=', '!', ',' or quotes".to_string(),
            ));
        }
        if variable.values().is_empty() {
            return Err(NamelistError::EmptyValue {
                group: name.to_string(),
                variable: var_name.to_string(),
            });
        }
        for value in variable.values() {
            if let Some(problem) = value_problem(value) {
                return Err(NamelistError::invalid_value(
                    format!("{}%{}", name, var_name),
                    value.clone(),
                    problem.to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Why `value` would not survive a write and re-read, if it would not.
fn value_problem(value: &str) -> Option<&'static str> {
    if value.contains(['\n', '\r']) {
        return Some("value on a single line");
    }
    if value.trim() != value {
        return Some("value without surrounding whitespace");
    }

    let mut quote: Option<char> = None;
    for c in value.chars() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, COMMENT | ',') => return Some("value with '!' or ',' only inside quotes"),
            _ => {}
        }
    }
    if quote.is_some() {
        return Some("value with balanced quotes");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namelist::Variable;

    #[test]
    fn test_whitespace_indents_are_accepted() {
        for indent in ["", " ", "    ", "\t", " \t "] {
            assert!(validate_indent(indent).is_ok(), "indent {:?}", indent);
        }
    }

    #[test]
    fn test_non_whitespace_indent_is_rejected() {
        for indent in ["x", "  .", "--"] {
            assert!(validate_indent(indent).is_err(), "indent {:?}", indent);
        }
    }

    #[test]
    fn test_unnamed_variable_is_rejected() {
        let mut group = NamelistGroup::new("g");
        group.insert(Variable::scalar("   ", "1"));
        assert!(matches!(
            validate_group(&group),
            Err(NamelistError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unreadable_group_names_are_rejected() {
        for name in ["my group", "a/b", "a=b", "a!b"] {
            let mut group = NamelistGroup::new(name);
            group.set("x", ["1"]);
            assert!(
                matches!(validate_group(&group), Err(NamelistError::InvalidValue { .. })),
                "group {:?}",
                name
            );
        }
        assert!(validate_group(&NamelistGroup::new("")).is_err());
    }

    #[test]
    fn test_unreadable_variable_names_are_rejected() {
        for name in ["a=b", "a!b", "a,b", "'a'", "&a", "/a"] {
            let mut group = NamelistGroup::new("g");
            group.insert(Variable::scalar(name, "1"));
            assert!(
                matches!(validate_group(&group), Err(NamelistError::InvalidValue { .. })),
                "variable {:?}",
                name
            );
        }
    }

    #[test]
    fn test_values() {
        for value in ["hello!world", "a,b", "'open", " padded", "two\nlines"] {
            let mut group = NamelistGroup::new("g");
            group.set("x", [value]);
            assert!(
                matches!(validate_group(&group), Err(NamelistError::InvalidValue { .. })),
                "value {:?}",
                value
            );
        }
        for value in ["'hello!world'", "\"a,b\"", "'it''s'", "1.0d-3", ".true.", ""] {
            let mut group = NamelistGroup::new("g");
            group.set("x", [value]);
            assert!(validate_group(&group).is_ok(), "value {:?}", value);
        }
    }
}
