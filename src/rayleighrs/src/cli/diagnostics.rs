// rayleighrs/src/cli/diagnostics.rs

use crate::cli::{load_catalog, read_namelist};
use crate::config::Settings;
use crate::constants::OUTPUT_GROUP;
use anyhow::Context;
use clap::Args;
use rayleighrs_diagnostics::{Classification, QuantityCatalog, UsageClassifier};
use rayleighrs_namelist::namelist::output_value_codes;
use rayleighrs_namelist::{Namelist, OutputKind};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct QuantitiesArgs {
    /// Only list the quantities of this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Include offsets in the listing
    #[arg(long)]
    pub offsets: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CategoriesArgs {
    /// List the quantities of every category
    #[arg(short, long)]
    pub verbose: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    pub file: PathBuf,

    /// Group holding the output lists
    #[arg(long, default_value = OUTPUT_GROUP)]
    pub group: String,
}

fn classify(catalog: &QuantityCatalog, settings: &Settings) -> anyhow::Result<Classification> {
    let dir = settings.diagnostics_dir();
    UsageClassifier::new(catalog)
        .classify_dir(&dir)
        .context(format!("Error classifying sources in {}", dir.display()))
}

pub fn list_quantities(args: &QuantitiesArgs, settings: &Settings) -> anyhow::Result<()> {
    let catalog = load_catalog(settings)?;

    let quantities: Vec<_> = match &args.category {
        Some(label) => {
            let classification = classify(&catalog, settings)?;
            classification
                .categories
                .into_iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(label))
                .map(|(_, quantities)| quantities)
                .with_context(|| format!("Unknown category '{}'", label))?
        }
        None => catalog
            .iter()
            .filter(|q| args.offsets || !q.is_offset())
            .cloned()
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quantities)?);
        return Ok(());
    }
    for quantity in &quantities {
        match quantity.formula() {
            Some(formula) => println!("{:<40} {}", quantity.to_string(), formula),
            None => println!("{}", quantity),
        }
    }
    Ok(())
}

pub fn list_categories(args: &CategoriesArgs, settings: &Settings) -> anyhow::Result<()> {
    let catalog = load_catalog(settings)?;
    let classification = classify(&catalog, settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }
    print!("{}", format_categories(&classification, args.verbose));
    Ok(())
}

pub fn format_categories(classification: &Classification, verbose: bool) -> String {
    let mut out = String::new();
    for (label, quantities) in &classification.categories {
        out.push_str(&format!("{} ({})\n", label, quantities.len()));
        if verbose {
            for quantity in quantities {
                out.push_str(&format!("  {}\n", quantity));
            }
        }
    }
    if !classification.unmapped.is_empty() {
        out.push_str("\nUnmapped call sites:\n");
        for unmapped in &classification.unmapped {
            out.push_str(&format!("  {}: {}\n", unmapped.file.display(), unmapped.name));
        }
    }
    out
}

/// A selected code that Rayleigh would not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputProblem {
    pub kind: OutputKind,
    pub code: i64,
    pub reason: &'static str,
}

/// Check every `<output>_values` code of `group` against the catalog.
pub fn find_output_problems(
    nml: &Namelist,
    group: &str,
    catalog: &QuantityCatalog,
) -> anyhow::Result<Vec<OutputProblem>> {
    let Some(group) = nml.get_group(group) else {
        return Ok(Vec::new());
    };

    let mut problems = Vec::new();
    for (kind, codes) in output_value_codes(group)? {
        for code in codes {
            let reason = match catalog.by_code(code) {
                None => "not a declared quantity code",
                Some(q) if q.is_offset() => "is an offset",
                Some(_) => continue,
            };
            problems.push(OutputProblem { kind, code, reason });
        }
    }
    Ok(problems)
}

pub fn check_outputs(args: &CheckArgs, settings: &Settings) -> anyhow::Result<()> {
    let nml = read_namelist(&args.file)?;
    if !nml.has_group(&args.group) {
        println!("No {} group in {}", args.group, args.file.display());
        return Ok(());
    }

    let catalog = load_catalog(settings)?;
    let problems = find_output_problems(&nml, &args.group, &catalog)?;
    if problems.is_empty() {
        println!("✓ All output codes in {} are valid", args.file.display());
        return Ok(());
    }

    for problem in &problems {
        println!(
            "  {}: {} {}",
            problem.kind.values_variable(),
            problem.code,
            problem.reason
        );
    }
    anyhow::bail!(
        "{} invalid output code(s) in {}",
        problems.len(),
        args.file.display()
    )
}
