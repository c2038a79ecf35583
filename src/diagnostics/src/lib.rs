// rayleighrs-diagnostics/src/lib.rs

//! Mine the Rayleigh diagnostics sources for output quantity codes.
//!
//! This library provides functionality to:
//! - Build the quantity catalog from `Diagnostics_Base.F90` and its includes,
//!   resolving offset-relative codes
//! - Sanitize the `:tex:` formula annotations of each quantity
//! - Group quantities into categories by the source file that computes them
//! - Render formulas into per-code files

pub mod catalog;
pub mod classify;
pub mod declaration;
pub mod error;
pub mod formula;
pub mod offsets;
pub mod render;

use std::path::Path;

pub use catalog::{Quantity, QuantityCatalog, DIAGNOSTICS_BASE};
pub use classify::{classify_file_name, Classification, FileClass, FileRule, UsageClassifier};
pub use error::{DiagnosticsError, Result};
pub use formula::{sanitize, TEX_MARKER};
pub use offsets::{OffsetTable, OFFSET_MARKER};
pub use render::{render_catalog, FormulaRenderer, FormulaSize, RenderSummary, TexSourceRenderer};

/// Build the catalog and classify it against the same diagnostics directory.
pub fn scan<P: AsRef<Path>>(diagnostics_dir: P) -> Result<(QuantityCatalog, Classification)> {
    let dir = diagnostics_dir.as_ref();
    let catalog = QuantityCatalog::from_diagnostics_dir(dir)?;
    let classification = UsageClassifier::new(&catalog).classify_dir(dir)?;
    Ok((catalog, classification))
}
