// rayleighrs-namelist/src/namelist/variable.rs

//! A single `name = value[,value...]` assignment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One assignment inside a namelist group.
///
/// Scalars and arrays share one representation: a scalar is simply a
/// variable with a single value. Values are kept as the raw text that
/// appeared in the file (or was supplied by the caller), so nothing is lost
/// to type inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    values: Vec<String>,
}

impl Variable {
    /// Create a variable, normalizing the name to lower case.
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.as_ref().trim().to_lowercase(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a single-valued variable.
    pub fn scalar<N: AsRef<str>, V: Into<String>>(name: N, value: V) -> Self {
        Self::new(name, [value])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Replace every value of this variable.
    pub fn set_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
    }

    /// The first value, which is the whole value for scalars.
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(|s| s.as_str())
    }

    pub fn is_array(&self) -> bool {
        self.values.len() > 1
    }

    /// Right-hand side as it is written to file.
    pub fn joined_values(&self) -> String {
        self.values.join(",")
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.joined_values())
    }
}
