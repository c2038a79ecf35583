// rayleighrs/src/cli/mod.rs

pub mod diagnostics;
pub mod namelist;
pub mod render;

pub use diagnostics::{
    check_outputs, list_categories, list_quantities, CategoriesArgs, CheckArgs, QuantitiesArgs,
};
pub use namelist::{
    add_outputs, format_namelist, remove_entry, set_variable, show_namelist, AddOutputsArgs,
    FormatArgs, RemoveArgs, SetArgs, ShowArgs,
};
pub use render::{render_formulas, RenderArgs};

use crate::config::Settings;
use anyhow::Context;
use clap::Args;
use rayleighrs_diagnostics::QuantityCatalog;
use rayleighrs_namelist::{Namelist, WriteOptions};
use std::path::{Path, PathBuf};

/// Where an edited namelist is written.
///
/// Without `--output` the input file is rewritten in place; a separate
/// output file is only replaced when `--overwrite` is given.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the result to FILE instead of editing in place
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Allow replacing an existing --output file
    #[arg(long, requires = "output")]
    pub overwrite: bool,
}

impl OutputArgs {
    pub fn target<'a>(&'a self, input: &'a Path) -> (&'a Path, bool) {
        match &self.output {
            Some(output) => (output.as_path(), self.overwrite),
            None => (input, true),
        }
    }

    /// Write `nml` to the chosen target and return its path.
    pub fn save(&self, nml: &Namelist, input: &Path, indent: &str) -> anyhow::Result<PathBuf> {
        let (path, overwrite) = self.target(input);
        let options = WriteOptions::default()
            .with_indent(indent)
            .with_overwrite(overwrite);
        rayleighrs_namelist::write_with_options(nml, path, &options)
            .context(format!("Error writing namelist {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

pub(crate) fn read_namelist(path: &Path) -> anyhow::Result<Namelist> {
    rayleighrs_namelist::read(path).context(format!("Error reading namelist {}", path.display()))
}

pub(crate) fn load_catalog(settings: &Settings) -> anyhow::Result<QuantityCatalog> {
    let dir = settings.diagnostics_dir();
    QuantityCatalog::from_diagnostics_dir(&dir).context(format!(
        "Error building the quantity catalog from {}",
        dir.display()
    ))
}
