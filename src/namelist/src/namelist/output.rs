// rayleighrs-namelist/src/namelist/output.rs

//! Output-type bookkeeping for the `<output>_values` variables.
//!
//! Rayleigh selects which quantity codes each output type writes through a
//! `<prefix>_values` list in the output namelist, e.g.
//! `shellslice_values = 1,2,3`.

use super::group::NamelistGroup;
use super::variable::Variable;
use crate::error::{NamelistError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The output types that accept a list of quantity codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputKind {
    ShellSlice,
    ShellSpectra,
    PointProbes,
    MeridionalSlice,
    EquatorialSlice,
    AzAverage,
    ShellAverage,
    GlobalAverage,
    SphMode,
    Spherical3D,
}

impl OutputKind {
    pub const ALL: [OutputKind; 10] = [
        OutputKind::ShellSlice,
        OutputKind::ShellSpectra,
        OutputKind::PointProbes,
        OutputKind::MeridionalSlice,
        OutputKind::EquatorialSlice,
        OutputKind::AzAverage,
        OutputKind::ShellAverage,
        OutputKind::GlobalAverage,
        OutputKind::SphMode,
        OutputKind::Spherical3D,
    ];

    /// Prefix used by the namelist variables of this output type.
    pub fn prefix(&self) -> &'static str {
        match self {
            OutputKind::ShellSlice => "shellslice",
            OutputKind::ShellSpectra => "shellspectra",
            OutputKind::PointProbes => "point_probe",
            OutputKind::MeridionalSlice => "meridional",
            OutputKind::EquatorialSlice => "equatorial",
            OutputKind::AzAverage => "azavg",
            OutputKind::ShellAverage => "shellavg",
            OutputKind::GlobalAverage => "globalavg",
            OutputKind::SphMode => "sph_mode",
            OutputKind::Spherical3D => "full3d",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OutputKind::ShellSlice => "Shell Slice",
            OutputKind::ShellSpectra => "Shell Spectra",
            OutputKind::PointProbes => "Point Probes",
            OutputKind::MeridionalSlice => "Meridional Slice",
            OutputKind::EquatorialSlice => "Equatorial Slice",
            OutputKind::AzAverage => "Az Average",
            OutputKind::ShellAverage => "Shell Average",
            OutputKind::GlobalAverage => "Global Average",
            OutputKind::SphMode => "SPH Mode",
            OutputKind::Spherical3D => "Spherical 3D",
        }
    }

    /// Name of the variable holding the quantity codes for this output type.
    pub fn values_variable(&self) -> String {
        format!("{}_values", self.prefix())
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for OutputKind {
    type Err = NamelistError;

    /// Accepts the namelist prefix (`shellslice`) or the label in any case,
    /// with spaces, dashes or underscores (`shell-slice`, `Shell Slice`).
    fn from_str(s: &str) -> Result<Self> {
        let squash = |t: &str| -> String {
            t.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = squash(s);
        OutputKind::ALL
            .into_iter()
            .find(|kind| squash(kind.prefix()) == wanted || squash(kind.label()) == wanted)
            .ok_or_else(|| {
                NamelistError::invalid_value("output type", s, "one of the Rayleigh output types")
            })
    }
}

/// Parse the values of a variable as quantity codes. Empty entries are skipped.
pub fn parse_codes(variable: &Variable) -> Result<Vec<i64>> {
    variable
        .values()
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                NamelistError::invalid_value(variable.name(), v, "integer quantity code")
            })
        })
        .collect()
}

/// Add quantity codes to the `<prefix>_values` variable of `group`.
///
/// The result is the union of the existing and new codes in ascending
/// order. Returns how many codes were not already present.
pub fn merge_output_values(
    group: &mut NamelistGroup,
    kind: OutputKind,
    codes: &[i64],
) -> Result<usize> {
    let name = kind.values_variable();
    let mut merged: BTreeSet<i64> = match group.get(&name) {
        Some(existing) => parse_codes(existing)?.into_iter().collect(),
        None => BTreeSet::new(),
    };
    let before = merged.len();
    merged.extend(codes.iter().copied());
    let added = merged.len() - before;

    group.insert(Variable::new(&name, merged.iter().map(|c| c.to_string())));
    log::debug!("merged {} new code(s) into {}%{}", added, group.name(), name);
    Ok(added)
}

/// The quantity codes selected by every output type present in `group`.
pub fn output_value_codes(group: &NamelistGroup) -> Result<Vec<(OutputKind, Vec<i64>)>> {
    let mut selected = Vec::new();
    for kind in OutputKind::ALL {
        if let Some(variable) = group.get(&kind.values_variable()) {
            selected.push((kind, parse_codes(variable)?));
        }
    }
    Ok(selected)
}
