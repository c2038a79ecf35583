// rayleighrs-namelist/src/namelist/core.rs

//! Core Namelist struct and basic operations.

use super::group::NamelistGroup;
use super::validation::validate_indent;
use crate::error::{NamelistError, Result};
use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete input file: an ordered collection of uniquely named groups.
///
/// Group order is insertion order and is the order groups are written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namelist {
    groups: LinkedHashMap<String, NamelistGroup>,
}

impl Namelist {
    /// Create a new empty namelist.
    pub fn new() -> Self {
        Self {
            groups: LinkedHashMap::new(),
        }
    }

    /// Get the group with this name, creating it at the end if it is missing.
    pub fn insert_group(&mut self, name: &str) -> &mut NamelistGroup {
        let key = name.trim().to_lowercase();
        self.groups
            .entry(key.clone())
            .or_insert_with(|| NamelistGroup::new(&key))
    }

    /// Insert a group object directly.
    ///
    /// An existing group with the same name is replaced where it stands.
    pub fn insert_group_object(&mut self, group: NamelistGroup) {
        match self.groups.get_mut(group.name()) {
            Some(existing) => *existing = group,
            None => {
                self.groups.insert(group.name().to_string(), group);
            }
        }
    }

    /// Get a group by name.
    pub fn get_group(&self, name: &str) -> Option<&NamelistGroup> {
        self.groups.get(&name.trim().to_lowercase())
    }

    /// Get a mutable reference to a group by name.
    pub fn get_group_mut(&mut self, name: &str) -> Option<&mut NamelistGroup> {
        self.groups.get_mut(&name.trim().to_lowercase())
    }

    /// Like [`Namelist::get_group_mut`], but a missing group is an error.
    pub fn require_group_mut(&mut self, name: &str) -> Result<&mut NamelistGroup> {
        let key = name.trim().to_lowercase();
        self.groups
            .get_mut(&key)
            .ok_or(NamelistError::GroupNotFound { group: key })
    }

    /// Check if a group exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(&name.trim().to_lowercase())
    }

    /// Remove a group by name.
    pub fn remove_group(&mut self, name: &str) -> Result<NamelistGroup> {
        let key = name.trim().to_lowercase();
        self.groups
            .remove(&key)
            .ok_or(NamelistError::GroupNotFound { group: key })
    }

    /// Get all group names in order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(|k| k.as_str()).collect()
    }

    /// Get an iterator over all groups in order.
    pub fn groups(&self) -> impl Iterator<Item = &NamelistGroup> {
        self.groups.values()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Get the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Render the whole file. Each group is followed by a blank line.
    ///
    /// Nothing is rendered unless the indent and every group are valid.
    pub fn to_namelist_string(&self, indent: &str) -> Result<String> {
        validate_indent(indent)?;

        let mut output = String::new();
        for group in self.groups() {
            output.push_str(&group.to_namelist_string(indent)?);
            output.push('\n');
        }
        Ok(output)
    }
}

impl Default for Namelist {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Namelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_namelist_string(crate::DEFAULT_INDENT) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<invalid namelist>"),
        }
    }
}
