// rayleighrs-diagnostics/src/catalog.rs

//! The quantity catalog: every diagnostic quantity code Rayleigh declares.
//!
//! The catalog is built by scanning the diagnostics base file and every
//! file it includes, in order. Offsets must be declared before use.

use crate::declaration::{classify_line, LineContext, RawDeclaration, SourceLine};
use crate::error::Result;
use crate::formula::extract_formula;
use crate::offsets::OffsetTable;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File that declares (or includes the declarations of) every quantity.
pub const DIAGNOSTICS_BASE: &str = "Diagnostics_Base.F90";

/// One declared diagnostic quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quantity {
    code: i64,
    name: String,
    formula: Option<String>,
    offset: bool,
}

impl Quantity {
    pub fn new<S: Into<String>>(code: i64, name: S, formula: Option<String>) -> Self {
        let name = name.into().to_lowercase();
        let offset = OffsetTable::is_offset_name(&name);
        Self {
            code,
            name,
            formula: if offset { None } else { formula },
            offset,
        }
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// Offsets are base values for other codes, not selectable outputs.
    pub fn is_offset(&self) -> bool {
        self.offset
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>5}  {}", self.code, self.name)
    }
}

/// All declared quantities, sorted by code.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct QuantityCatalog {
    quantities: Vec<Arc<Quantity>>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl QuantityCatalog {
    /// Directory holding the diagnostics sources: the explicit override, or
    /// `src/Diagnostics` below the Rayleigh checkout.
    pub fn locate(rayleigh_dir: &Path, diagnostics_dir: Option<&Path>) -> PathBuf {
        match diagnostics_dir {
            Some(dir) => dir.to_path_buf(),
            None => rayleigh_dir.join("src").join("Diagnostics"),
        }
    }

    /// Build the catalog from `Diagnostics_Base.F90` inside `diagnostics_dir`.
    pub fn from_diagnostics_dir<P: AsRef<Path>>(diagnostics_dir: P) -> Result<Self> {
        Self::from_base_file(diagnostics_dir.as_ref().join(DIAGNOSTICS_BASE))
    }

    /// Build the catalog from a base file, following its includes.
    pub fn from_base_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("building quantity catalog from {}", path.display());

        let mut builder = CatalogBuilder::default();
        builder.scan_file(path, true)?;
        let catalog = builder.finish();

        log::info!(
            "catalog holds {} quantities ({} offsets)",
            catalog.len(),
            catalog.offsets().count()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-resolved quantities.
    ///
    /// Entries are sorted by code; exact (code, name) duplicates are dropped.
    pub fn from_quantities<I: IntoIterator<Item = Quantity>>(quantities: I) -> Self {
        let mut seen = HashSet::new();
        let mut quantities: Vec<Arc<Quantity>> = quantities
            .into_iter()
            .filter(|q| seen.insert((q.code, q.name.clone())))
            .map(Arc::new)
            .collect();
        quantities.sort_by_key(|q| q.code);

        let mut by_name = HashMap::with_capacity(quantities.len());
        for (idx, q) in quantities.iter().enumerate() {
            by_name.entry(q.name.clone()).or_insert(idx);
        }

        Self {
            quantities,
            by_name,
        }
    }

    /// Look a quantity up by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Arc<Quantity>> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.quantities[idx])
    }

    /// First quantity declared with `code`.
    pub fn by_code(&self, code: i64) -> Option<&Arc<Quantity>> {
        let idx = self.quantities.partition_point(|q| q.code < code);
        self.quantities.get(idx).filter(|q| q.code == code)
    }

    pub fn offsets(&self) -> impl Iterator<Item = &Arc<Quantity>> {
        self.quantities.iter().filter(|q| q.offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Quantity>> {
        self.quantities.iter()
    }

    pub fn quantities(&self) -> &[Arc<Quantity>] {
        &self.quantities
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl<'a> IntoIterator for &'a QuantityCatalog {
    type Item = &'a Arc<Quantity>;
    type IntoIter = std::slice::Iter<'a, Arc<Quantity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Default)]
struct CatalogBuilder {
    offsets: OffsetTable,
    quantities: Vec<Quantity>,
}

impl CatalogBuilder {
    fn scan_file(&mut self, path: &Path, follow_includes: bool) -> Result<()> {
        let content = fs_err::read_to_string(path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        log::debug!("scanning declarations in {}", path.display());

        for (idx, text) in content.lines().enumerate() {
            let ctx = LineContext {
                file: path,
                line: idx + 1,
                text,
            };
            match classify_line(&ctx)? {
                SourceLine::Include(target) => {
                    let Some(target) = target else {
                        return Err(ctx.include_failed(text.trim(), "no quoted file name"));
                    };
                    if !follow_includes {
                        return Err(ctx.include_failed(&target, "nested includes are not supported"));
                    }
                    let included = dir.join(&target);
                    if !included.is_file() {
                        return Err(ctx.include_failed(
                            &target,
                            format!("{} does not exist", included.display()),
                        ));
                    }
                    self.scan_file(&included, false)?;
                }
                SourceLine::Declaration(decl) => self.add(decl, &ctx)?,
                SourceLine::Blank | SourceLine::Other => {}
            }
        }
        Ok(())
    }

    fn add(&mut self, decl: RawDeclaration, ctx: &LineContext<'_>) -> Result<()> {
        let code = self.offsets.resolve(&decl.name, &decl.expr, ctx)?;
        let formula = decl.comment.as_deref().and_then(extract_formula);
        self.quantities.push(Quantity::new(code, decl.name, formula));
        Ok(())
    }

    fn finish(self) -> QuantityCatalog {
        log::debug!("resolved {} offsets", self.offsets.len());
        QuantityCatalog::from_quantities(self.quantities)
    }
}
