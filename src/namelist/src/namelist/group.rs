// rayleighrs-namelist/src/namelist/group.rs

//! Namelist group data structure and operations.

use super::validation;
use super::variable::Variable;
use crate::error::{NamelistError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a variable is added to a group that may already hold that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Overwrite the existing entry in place, keeping its position
    #[default]
    Replace,
    /// Always push a new entry, even if the name is already present
    Append,
}

/// A single namelist group: a name and its ordered variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamelistGroup {
    name: String,
    variables: Vec<Variable>,
}

impl NamelistGroup {
    /// Create a new empty namelist group.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            variables: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a variable, replacing an existing entry of the same name in place.
    pub fn insert(&mut self, variable: Variable) -> &mut Self {
        self.insert_with_mode(variable, InsertMode::Replace)
    }

    /// Push a variable to the end, keeping any existing entry of the same name.
    ///
    /// The group then holds several entries for one name until the caller
    /// removes or replaces them; writers emit every entry in order.
    pub fn append(&mut self, variable: Variable) -> &mut Self {
        self.insert_with_mode(variable, InsertMode::Append)
    }

    pub fn insert_with_mode(&mut self, variable: Variable, mode: InsertMode) -> &mut Self {
        match mode {
            InsertMode::Replace => match self.position(variable.name()) {
                Some(idx) => self.variables[idx] = variable,
                None => self.variables.push(variable),
            },
            InsertMode::Append => self.variables.push(variable),
        }
        self
    }

    /// Shorthand for inserting `name = values` in replace mode.
    pub fn set<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(Variable::new(name, values))
    }

    /// Get the first variable with the given name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        let name = name.trim().to_lowercase();
        self.variables.iter().find(|v| v.name() == name)
    }

    /// Get a mutable reference to the first variable with the given name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let name = name.trim().to_lowercase();
        self.variables.iter_mut().find(|v| v.name() == name)
    }

    /// Every entry with the given name, in order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Variable> + 'a {
        let name = name.trim().to_lowercase();
        self.variables.iter().filter(move |v| v.name() == name)
    }

    /// Check if a variable exists.
    pub fn has_variable(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove every entry with the given name and return them.
    pub fn remove(&mut self, name: &str) -> Result<Vec<Variable>> {
        let key = name.trim().to_lowercase();
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .variables
            .drain(..)
            .partition(|v| v.name() == key);
        self.variables = kept;

        if removed.is_empty() {
            return Err(NamelistError::VariableNotFound {
                variable: key,
                group: self.name.clone(),
            });
        }
        Ok(removed)
    }

    /// Get all variable names in order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name()).collect()
    }

    /// Get an iterator over all variables.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Render this group, including its `&name` and `/` markers.
    pub fn to_namelist_string(&self, indent: &str) -> Result<String> {
        validation::validate_indent(indent)?;
        validation::validate_group(self)?;

        let mut output = String::new();
        output.push('&');
        output.push_str(&self.name);
        output.push('\n');

        for variable in &self.variables {
            output.push_str(indent);
            output.push_str(variable.name());
            output.push_str(" = ");
            output.push_str(&variable.joined_values());
            output.push('\n');
        }

        output.push_str("/\n");
        Ok(output)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name() == name)
    }
}

impl fmt::Display for NamelistGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_namelist_string(crate::DEFAULT_INDENT) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<invalid group>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NamelistGroup {
        let mut group = NamelistGroup::new("Physical_Controls");
        group
            .set("rotation", [".true."])
            .set("n", ["1"])
            .set("magnetism", [".false."]);
        group
    }

    #[test]
    fn test_group_name_is_lowercase() {
        assert_eq!(sample().name(), "physical_controls");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut group = sample();
        group.insert(Variable::new("N", ["2", "3"]));

        assert_eq!(group.variable_names(), vec!["rotation", "n", "magnetism"]);
        assert_eq!(group.get("n").unwrap().values(), &["2", "3"]);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_append_keeps_both_entries() {
        let mut group = sample();
        group.append(Variable::scalar("n", "5"));

        assert_eq!(
            group.variable_names(),
            vec!["rotation", "n", "magnetism", "n"]
        );
        let all: Vec<_> = group.get_all("n").map(|v| v.first().unwrap()).collect();
        assert_eq!(all, vec!["1", "5"]);
        // lookups see the first entry
        assert_eq!(group.get("n").unwrap().first(), Some("1"));
    }

    #[test]
    fn test_remove() {
        let mut group = sample();
        group.append(Variable::scalar("n", "5"));

        let removed = group.remove("N").unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(group.variable_names(), vec!["rotation", "magnetism"]);

        let err = group.remove("n").unwrap_err();
        assert!(matches!(err, NamelistError::VariableNotFound { .. }));
    }

    #[test]
    fn test_to_namelist_string() {
        let mut group = NamelistGroup::new("output_namelist");
        group
            .set("shellslice_levels", ["0.5", "0.9"])
            .set("shellslice_frequency", ["1000"]);

        let text = group.to_namelist_string("  ").unwrap();
        assert_eq!(
            text,
            "&output_namelist\n  shellslice_levels = 0.5,0.9\n  shellslice_frequency = 1000\n/\n"
        );
    }

    #[test]
    fn test_to_namelist_string_rejects_bad_indent() {
        let err = sample().to_namelist_string("\t->").unwrap_err();
        assert!(matches!(err, NamelistError::FormatConfig { .. }));
    }

    #[test]
    fn test_to_namelist_string_rejects_empty_value() {
        let mut group = sample();
        group.insert(Variable::new("empty", Vec::<String>::new()));

        let err = group.to_namelist_string(" ").unwrap_err();
        match err {
            NamelistError::EmptyValue { group, variable } => {
                assert_eq!(group, "physical_controls");
                assert_eq!(variable, "empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
