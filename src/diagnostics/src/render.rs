// rayleighrs-diagnostics/src/render.rs

//! Render quantity formulas into per-code files.
//!
//! Each renderable quantity ends up as `<dir>/<code>.<ext>`. Rendering is
//! behind the `FormulaRenderer` trait so that a rasterizing backend can be
//! swapped in; `TexSourceRenderer` writes standalone LaTeX documents.

use crate::catalog::QuantityCatalog;
use crate::error::{DiagnosticsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Target size of a rendered formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaSize {
    pub width: u32,
    pub height: u32,
    /// Multiplier applied to both dimensions
    pub padding: f64,
}

impl FormulaSize {
    pub fn padded_width(&self) -> f64 {
        self.width as f64 * self.padding
    }

    pub fn padded_height(&self) -> f64 {
        self.height as f64 * self.padding
    }
}

impl Default for FormulaSize {
    fn default() -> Self {
        Self {
            width: 150,
            height: 20,
            padding: 1.5,
        }
    }
}

pub trait FormulaRenderer {
    /// File extension of the produced files, without the dot.
    fn extension(&self) -> &str;

    fn render(&self, code: i64, formula: &str, size: &FormulaSize, dest: &Path) -> Result<()>;
}

/// Writes each formula as a standalone LaTeX document.
#[derive(Debug, Clone, Default)]
pub struct TexSourceRenderer;

impl TexSourceRenderer {
    pub fn document(formula: &str, size: &FormulaSize) -> String {
        format!(
            "\\documentclass[border=2pt,varwidth={:.1}pt]{{standalone}}\n\
             \\usepackage{{amsmath}}\n\
             \\begin{{document}}\n\
             \\vbox to {:.1}pt{{\\vfil\\hbox{{{}}}\\vfil}}\n\
             \\end{{document}}\n",
            size.padded_width(),
            size.padded_height(),
            formula
        )
    }
}

impl FormulaRenderer for TexSourceRenderer {
    fn extension(&self) -> &str {
        "tex"
    }

    fn render(&self, code: i64, formula: &str, size: &FormulaSize, dest: &Path) -> Result<()> {
        if formula.trim().is_empty() {
            return Err(DiagnosticsError::Render {
                code,
                message: "formula is empty".to_string(),
            });
        }
        fs_err::write(dest, Self::document(formula, size))?;
        Ok(())
    }
}

/// What a `render_catalog` run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub written: Vec<PathBuf>,
    /// Existing files left alone because overwriting was off
    pub kept: Vec<PathBuf>,
    /// Quantities without a formula annotation
    pub without_formula: usize,
    pub offsets: usize,
}

/// Render every catalog formula into `dir`, creating it if needed.
///
/// Offsets are never rendered. An existing file is replaced only when
/// `overwrite` is set.
pub fn render_catalog<R: FormulaRenderer + ?Sized>(
    catalog: &QuantityCatalog,
    renderer: &R,
    dir: &Path,
    size: &FormulaSize,
    overwrite: bool,
) -> Result<RenderSummary> {
    if !dir.is_dir() {
        log::info!("creating {}", dir.display());
        fs_err::create_dir_all(dir)?;
    }

    let mut summary = RenderSummary::default();
    for quantity in catalog {
        if quantity.is_offset() {
            summary.offsets += 1;
            continue;
        }
        let Some(formula) = quantity.formula() else {
            summary.without_formula += 1;
            continue;
        };

        let dest = dir.join(format!("{}.{}", quantity.code(), renderer.extension()));
        if dest.exists() && !overwrite {
            log::debug!("keeping existing {}", dest.display());
            summary.kept.push(dest);
            continue;
        }

        renderer.render(quantity.code(), formula, size, &dest)?;
        log::debug!("rendered {} -> {}", quantity.name(), dest.display());
        summary.written.push(dest);
    }

    log::info!(
        "rendered {} formulas into {} ({} kept)",
        summary.written.len(),
        dir.display(),
        summary.kept.len()
    );
    Ok(summary)
}
