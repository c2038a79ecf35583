// rayleighrs/src/cli/render.rs

use crate::cli::load_catalog;
use crate::config::Settings;
use anyhow::Context;
use clap::Args;
use rayleighrs_diagnostics::{render_catalog, RenderSummary, TexSourceRenderer};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Destination directory (defaults to `tex.image_path`)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Replace existing formula files
    #[arg(long, conflicts_with = "keep_existing")]
    pub overwrite: bool,

    /// Never replace existing formula files
    #[arg(long)]
    pub keep_existing: bool,

    /// Render even when `tex.enabled` is false
    #[arg(long)]
    pub force: bool,
}

impl RenderArgs {
    fn overwrite(&self, settings: &Settings) -> bool {
        if self.overwrite {
            true
        } else if self.keep_existing {
            false
        } else {
            settings.tex().overwrite
        }
    }
}

pub fn render_formulas(args: &RenderArgs, settings: &Settings) -> anyhow::Result<Option<RenderSummary>> {
    let tex = settings.tex();
    if !tex.enabled && !args.force {
        log::warn!("formula rendering is disabled (tex.enabled = false), use --force to render anyway");
        return Ok(None);
    }

    let catalog = load_catalog(settings)?;
    let dir = args.dir.clone().unwrap_or_else(|| tex.image_path.clone());
    let summary = render_catalog(
        &catalog,
        &TexSourceRenderer,
        &dir,
        &tex.size(),
        args.overwrite(settings),
    )
    .context(format!("Error rendering formulas into {}", dir.display()))?;

    println!(
        "✓ Wrote {} formula file(s) to {} ({} kept, {} without formula)",
        summary.written.len(),
        dir.display(),
        summary.kept.len(),
        summary.without_formula
    );
    Ok(Some(summary))
}
