// rayleighrs/src/cli/namelist.rs

use crate::cli::{load_catalog, read_namelist, OutputArgs};
use crate::config::Settings;
use crate::constants::OUTPUT_GROUP;
use anyhow::Context;
use clap::Args;
use rayleighrs_diagnostics::QuantityCatalog;
use rayleighrs_namelist::namelist::merge_output_values;
use rayleighrs_namelist::{InsertMode, OutputKind, Variable};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Namelist file to read
    pub file: PathBuf,

    /// Only show this group
    #[arg(short, long)]
    pub group: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    pub file: PathBuf,
    pub group: String,
    pub name: String,

    /// One or more values; several values make an array
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Add another assignment instead of replacing an existing one
    #[arg(long)]
    pub append: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    pub file: PathBuf,
    pub group: String,

    /// Variable to remove; the whole group is removed when omitted
    pub name: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    pub file: PathBuf,

    /// Indentation to use instead of the configured one
    #[arg(long)]
    pub indent: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AddOutputsArgs {
    pub file: PathBuf,

    /// Output type, e.g. shellslice, "Shell Slice", azavg
    #[arg(short, long)]
    pub kind: OutputKind,

    /// Quantity codes or names
    #[arg(allow_hyphen_values = true)]
    pub quantities: Vec<String>,

    /// Add every quantity of a category
    #[arg(short, long)]
    pub category: Vec<String>,

    /// Group holding the output lists
    #[arg(long, default_value = OUTPUT_GROUP)]
    pub group: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Render the requested part of a namelist as text.
pub fn format_show(args: &ShowArgs, settings: &Settings) -> anyhow::Result<String> {
    let nml = read_namelist(&args.file)?;

    match (&args.group, args.json) {
        (Some(name), json) => {
            let group = nml
                .get_group(name)
                .with_context(|| format!("No group '{}' in {}", name, args.file.display()))?;
            if json {
                Ok(serde_json::to_string_pretty(group)?)
            } else {
                Ok(group.to_namelist_string(settings.indent())?)
            }
        }
        (None, true) => Ok(rayleighrs_namelist::to_json(&nml)?),
        (None, false) => Ok(nml.to_namelist_string(settings.indent())?),
    }
}

pub fn show_namelist(args: &ShowArgs, settings: &Settings) -> anyhow::Result<()> {
    let text = format_show(args, settings)?;
    print!("{}", text);
    if args.json {
        println!();
    }
    Ok(())
}

pub fn set_variable(args: &SetArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut nml = read_namelist(&args.file)?;

    let mode = if args.append {
        InsertMode::Append
    } else {
        InsertMode::Replace
    };
    let variable = Variable::new(&args.name, args.values.iter().map(String::as_str));
    nml.insert_group(&args.group)
        .insert_with_mode(variable, mode);

    let path = args.output.save(&nml, &args.file, settings.indent())?;
    println!("✓ Set {}%{} in {}", args.group, args.name, path.display());
    Ok(())
}

pub fn remove_entry(args: &RemoveArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut nml = read_namelist(&args.file)?;

    match &args.name {
        Some(name) => {
            let removed = nml.require_group_mut(&args.group)?.remove(name)?;
            log::debug!("removed {} assignment(s) of {}", removed.len(), name);
        }
        None => {
            nml.remove_group(&args.group)?;
        }
    }

    let path = args.output.save(&nml, &args.file, settings.indent())?;
    println!("✓ Updated {}", path.display());
    Ok(())
}

pub fn format_namelist(args: &FormatArgs, settings: &Settings) -> anyhow::Result<()> {
    let nml = read_namelist(&args.file)?;
    let indent = args.indent.as_deref().unwrap_or(settings.indent());

    let path = args.output.save(&nml, &args.file, indent)?;
    println!("✓ Formatted {}", path.display());
    Ok(())
}

pub fn add_outputs(args: &AddOutputsArgs, settings: &Settings) -> anyhow::Result<()> {
    if args.quantities.is_empty() && args.category.is_empty() {
        anyhow::bail!("Nothing to add: give quantity codes, names or --category");
    }

    let needs_catalog = !args.category.is_empty()
        || args.quantities.iter().any(|q| q.trim().parse::<i64>().is_err());
    let catalog = if needs_catalog {
        Some(load_catalog(settings)?)
    } else {
        None
    };
    let codes = resolve_codes(&args.quantities, &args.category, catalog.as_ref(), settings)?;

    let mut nml = read_namelist(&args.file)?;
    let group = nml.insert_group(&args.group);
    let codes: Vec<i64> = codes.into_iter().collect();
    let added = merge_output_values(group, args.kind, &codes)?;

    let path = args.output.save(&nml, &args.file, settings.indent())?;
    println!(
        "✓ Added {} new code(s) to {} in {}",
        added,
        args.kind.values_variable(),
        path.display()
    );
    Ok(())
}

/// Turn codes, names and categories into a set of quantity codes.
///
/// Names and categories need the catalog; bare codes are taken as given
/// when no catalog was loaded.
pub fn resolve_codes(
    quantities: &[String],
    categories: &[String],
    catalog: Option<&QuantityCatalog>,
    settings: &Settings,
) -> anyhow::Result<BTreeSet<i64>> {
    let mut codes = BTreeSet::new();

    for token in quantities {
        let token = token.trim();
        let quantity = match (token.parse::<i64>(), catalog) {
            (Ok(code), None) => {
                codes.insert(code);
                continue;
            }
            (Ok(code), Some(catalog)) => catalog
                .by_code(code)
                .with_context(|| format!("Quantity code {} is not declared", code))?,
            (Err(_), Some(catalog)) => catalog
                .get(token)
                .with_context(|| format!("Unknown quantity '{}'", token))?,
            (Err(_), None) => anyhow::bail!("Unknown quantity '{}'", token),
        };
        if quantity.is_offset() {
            anyhow::bail!("'{}' is an offset, not an output quantity", quantity.name());
        }
        codes.insert(quantity.code());
    }

    if !categories.is_empty() {
        let catalog = catalog.context("Categories need the quantity catalog")?;
        let classification = rayleighrs_diagnostics::UsageClassifier::new(catalog)
            .classify_dir(settings.diagnostics_dir())
            .context("Error classifying the diagnostics sources")?;
        for label in categories {
            let found = classification
                .categories
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(label))
                .map(|(_, quantities)| quantities)
                .with_context(|| format!("Unknown category '{}'", label))?;
            codes.extend(found.iter().map(|q| q.code()));
        }
    }

    Ok(codes)
}
