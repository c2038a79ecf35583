// rayleighrs-diagnostics/src/classify.rs

//! Group catalog quantities by the diagnostics source file that computes them.
//!
//! Each `Diagnostics_<Label>.F90` file becomes a category named `<Label>`;
//! a quantity belongs to it when the file calls `compute_quantity(<name>)`.

use crate::catalog::{Quantity, QuantityCatalog};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Function whose call sites mark a quantity as computed by a file.
pub const CALL_SITE: &str = "compute_quantity";

/// Files that match the naming pattern but hold no category of their own.
pub const DENY_LIST: [&str; 4] = [
    "diagnostics_base.f90",
    "diagnostics_interface.f90",
    "diagnostics_adotgradb.f90",
    "diagnostics_mean_correction.f90",
];

lazy_static! {
    static ref CALL: Regex = Regex::new(&format!(r"{}\s*\(([^()]*)\)", CALL_SITE)).unwrap();
}

/// File name rules, applied in `FileRule::ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRule {
    /// The name must contain "diagnostics"
    DiagnosticsPrefix,
    /// The name must not be on `DENY_LIST`
    DenyList,
    /// A non-empty label must follow the first underscore
    CategoryLabel,
}

/// Result of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Reject,
    /// The file is a category with this label
    Label(String),
}

impl FileRule {
    pub const ORDER: [FileRule; 3] = [
        FileRule::DiagnosticsPrefix,
        FileRule::DenyList,
        FileRule::CategoryLabel,
    ];

    pub fn evaluate(&self, file_name: &str) -> RuleOutcome {
        let lower = file_name.to_lowercase();
        match self {
            FileRule::DiagnosticsPrefix => {
                if lower.contains("diagnostics") {
                    RuleOutcome::Pass
                } else {
                    RuleOutcome::Reject
                }
            }
            FileRule::DenyList => {
                if DENY_LIST.contains(&lower.as_str()) {
                    RuleOutcome::Reject
                } else {
                    RuleOutcome::Pass
                }
            }
            FileRule::CategoryLabel => match category_label(file_name) {
                Some(label) => RuleOutcome::Label(label),
                None => RuleOutcome::Reject,
            },
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileRule::DiagnosticsPrefix => "name does not mention diagnostics",
            FileRule::DenyList => "infrastructure file",
            FileRule::CategoryLabel => "no category label after the first underscore",
        }
    }
}

impl fmt::Display for FileRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileClass {
    Category(String),
    Rejected(FileRule),
}

/// Apply the file rules in order; the first rejecting rule wins.
pub fn classify_file_name(file_name: &str) -> FileClass {
    for rule in FileRule::ORDER {
        match rule.evaluate(file_name) {
            RuleOutcome::Pass => continue,
            RuleOutcome::Reject => return FileClass::Rejected(rule),
            RuleOutcome::Label(label) => return FileClass::Category(label),
        }
    }
    FileClass::Rejected(FileRule::CategoryLabel)
}

/// `Diagnostics_Velocity_Field.F90` -> `Velocity_Field`
pub fn category_label(file_name: &str) -> Option<String> {
    let (_, rest) = file_name.split_once('_')?;
    let label = match rest.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => rest,
    };
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Names passed to `compute_quantity(...)` in one source text, lower-cased
/// and deduplicated.
pub fn call_site_names(content: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }
        let lower = trimmed.to_lowercase();
        for caps in CALL.captures_iter(&lower) {
            let name = caps[1].trim();
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
    }
    names
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedName {
    pub file: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: PathBuf,
    pub rule: FileRule,
}

/// Quantities per category, plus what could not be classified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// Category label to quantities, each list sorted by code
    pub categories: BTreeMap<String, Vec<Arc<Quantity>>>,
    /// Call-site names that are not in the catalog
    pub unmapped: Vec<UnmappedName>,
    /// Files rejected by a file rule
    pub skipped: Vec<SkippedFile>,
}

impl Classification {
    pub fn category(&self, label: &str) -> Option<&[Arc<Quantity>]> {
        self.categories.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

/// Classifies diagnostics source files against a catalog.
pub struct UsageClassifier<'a> {
    catalog: &'a QuantityCatalog,
    categories: BTreeMap<String, BTreeMap<i64, Arc<Quantity>>>,
    unmapped: Vec<UnmappedName>,
    skipped: Vec<SkippedFile>,
}

impl<'a> UsageClassifier<'a> {
    pub fn new(catalog: &'a QuantityCatalog) -> Self {
        Self {
            catalog,
            categories: BTreeMap::new(),
            unmapped: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Classify every regular file directly inside `dir`, in name order.
    pub fn classify_dir<P: AsRef<Path>>(mut self, dir: P) -> Result<Classification> {
        let dir = dir.as_ref();
        log::info!("classifying diagnostics sources in {}", dir.display());

        let mut files = Vec::new();
        for entry in fs_err::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            match classify_file_name(&file_name) {
                FileClass::Rejected(rule) => {
                    log::debug!("skipping {}: {}", file_name, rule);
                    self.skipped.push(SkippedFile { file: path, rule });
                }
                FileClass::Category(label) => {
                    let content = fs_err::read_to_string(&path)?;
                    self.add_source(&path, &label, &content);
                }
            }
        }
        Ok(self.finish())
    }

    /// Record the call sites of one source text under `label`.
    pub fn add_source(&mut self, file: &Path, label: &str, content: &str) {
        let names = call_site_names(content);
        log::debug!(
            "{}: {} compute_quantity call sites",
            file.display(),
            names.len()
        );

        for name in names {
            match self.catalog.get(&name) {
                Some(quantity) => {
                    self.categories
                        .entry(label.to_string())
                        .or_default()
                        .entry(quantity.code())
                        .or_insert_with(|| Arc::clone(quantity));
                }
                None => {
                    log::debug!("{}: '{}' is not a known quantity", file.display(), name);
                    self.unmapped.push(UnmappedName {
                        file: file.to_path_buf(),
                        name,
                    });
                }
            }
        }
    }

    pub fn finish(self) -> Classification {
        let categories = self
            .categories
            .into_iter()
            .filter(|(_, quantities)| !quantities.is_empty())
            .map(|(label, quantities)| (label, quantities.into_values().collect()))
            .collect();
        Classification {
            categories,
            unmapped: self.unmapped,
            skipped: self.skipped,
        }
    }
}
