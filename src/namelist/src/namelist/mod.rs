// rayleighrs-namelist/src/namelist/mod.rs

//! Namelist data structures.
//!
//! A [`Namelist`] is an ordered set of [`NamelistGroup`]s, each of which is
//! an ordered list of [`Variable`] assignments.

pub mod core;
pub mod group;
pub mod output;
pub mod validation;
pub mod variable;

// Re-export the main types
pub use self::core::Namelist;
pub use group::{InsertMode, NamelistGroup};
pub use output::{merge_output_values, output_value_codes, OutputKind};
pub use variable::Variable;
