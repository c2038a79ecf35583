// rayleighrs/src/config/settings.rs

use crate::constants::{DEFAULT_CONFIG_NAME, DEFAULT_FORMULA_DIR, DEFAULT_RAYLEIGH_SUBDIR};
use anyhow::Context;
use rayleighrs_diagnostics::{FormulaSize, QuantityCatalog};
use rayleighrs_namelist::namelist::validation::validate_indent;
use rayleighrs_namelist::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User and machine specific settings, read from `rayleighrs.yml`.
///
/// Every key is optional:
///
/// ```yaml
/// rayleigh_dir: /opt/Rayleigh
/// diagnostics_dir: /opt/Rayleigh/src/build
/// indent: "   "
/// tex:
///   enabled: true
///   image_path: quantity_code_formulas
///   overwrite: true
///   padding: 1.5
///   width: 150
///   height: 20
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    rayleigh_dir: Option<PathBuf>,
    diagnostics_dir: Option<PathBuf>,
    indent: String,
    tex: TexSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TexSettings {
    pub enabled: bool,
    pub image_path: PathBuf,
    /// Replace formula files that already exist
    pub overwrite: bool,
    pub padding: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rayleigh_dir: None,
            diagnostics_dir: None,
            indent: DEFAULT_INDENT.to_string(),
            tex: TexSettings::default(),
        }
    }
}

impl Default for TexSettings {
    fn default() -> Self {
        let size = FormulaSize::default();
        Self {
            enabled: true,
            image_path: PathBuf::from(DEFAULT_FORMULA_DIR),
            overwrite: true,
            padding: size.padding,
            width: size.width,
            height: size.height,
        }
    }
}

impl TexSettings {
    pub fn size(&self) -> FormulaSize {
        FormulaSize {
            width: self.width,
            height: self.height,
            padding: self.padding,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `rayleighrs.yml` in the working
    /// directory when no path is given. Only an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::try_from(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_NAME);
                if default_path.is_file() {
                    Self::try_from(default_path)
                } else {
                    log::debug!("no {} found, using default settings", DEFAULT_CONFIG_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command line overrides on top of the file settings.
    pub fn with_overrides(
        mut self,
        rayleigh_dir: Option<PathBuf>,
        diagnostics_dir: Option<PathBuf>,
    ) -> Self {
        if rayleigh_dir.is_some() {
            self.rayleigh_dir = rayleigh_dir;
        }
        if diagnostics_dir.is_some() {
            self.diagnostics_dir = diagnostics_dir;
        }
        self
    }

    /// The Rayleigh checkout, `$HOME/Programs/Rayleigh-Fork` by default.
    pub fn rayleigh_dir(&self) -> PathBuf {
        match &self.rayleigh_dir {
            Some(dir) => dir.clone(),
            None => {
                let home = std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                DEFAULT_RAYLEIGH_SUBDIR
                    .iter()
                    .fold(home, |dir, part| dir.join(part))
            }
        }
    }

    /// Directory holding `Diagnostics_Base.F90`.
    pub fn diagnostics_dir(&self) -> PathBuf {
        QuantityCatalog::locate(&self.rayleigh_dir(), self.diagnostics_dir.as_deref())
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn tex(&self) -> &TexSettings {
        &self.tex
    }

    fn validate(&self) -> anyhow::Result<()> {
        validate_indent(&self.indent).context("Invalid `indent` setting")?;
        if !(self.tex.padding.is_finite() && self.tex.padding > 0.0) {
            anyhow::bail!("`tex.padding` must be a positive number, got {}", self.tex.padding);
        }
        Ok(())
    }
}

impl TryFrom<&Path> for Settings {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs_err::read_to_string(path)
            .context(format!("Error reading {} to string.", path.display()))?;

        let settings = if content.trim().is_empty() {
            Settings::default()
        } else {
            serde_saphyr::from_str::<Settings>(&content)
                .context(format!("Error parsing YAML file: {}", path.display()))?
        };
        settings
            .validate()
            .context(format!("Invalid settings in {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

impl TryFrom<&PathBuf> for Settings {
    type Error = anyhow::Error;

    fn try_from(path: &PathBuf) -> anyhow::Result<Self> {
        Self::try_from(path.as_path())
    }
}
