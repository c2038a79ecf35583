// rayleighrs/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use rayleighrs::cli::{
    add_outputs, check_outputs, format_namelist, list_categories, list_quantities,
    remove_entry, render_formulas, set_variable, show_namelist, AddOutputsArgs, CategoriesArgs,
    CheckArgs, FormatArgs, QuantitiesArgs, RemoveArgs, RenderArgs, SetArgs, ShowArgs,
};
use rayleighrs::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rayleighrs")]
#[command(about = "Edit Rayleigh namelists and browse its diagnostic output quantities", long_about = None)]
#[command(version = env!("RAYLEIGHRS_CLI_VERSION"))]
struct Cli {
    /// Settings file (defaults to ./rayleighrs.yml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Rayleigh source checkout
    #[arg(long, value_name = "DIR", env = "RAYLEIGH_DIR", global = true)]
    rayleigh_dir: Option<PathBuf>,

    /// Directory holding Diagnostics_Base.F90 (defaults to <rayleigh-dir>/src/Diagnostics)
    #[arg(long, value_name = "DIR", global = true)]
    diagnostics_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a namelist file in canonical form
    Show(ShowArgs),
    /// Set a variable, creating its group if needed
    Set(SetArgs),
    /// Remove a variable or a whole group
    Remove(RemoveArgs),
    /// Rewrite a namelist file in canonical form
    Format(FormatArgs),
    /// List the declared diagnostic quantities
    Quantities(QuantitiesArgs),
    /// List quantity categories by diagnostics source file
    Categories(CategoriesArgs),
    /// Add quantity codes to an output type's values list
    AddOutputs(AddOutputsArgs),
    /// Check output codes against the quantity catalog
    Check(CheckArgs),
    /// Write formula files for every quantity
    Render(RenderArgs),
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?
        .with_overrides(cli.rayleigh_dir, cli.diagnostics_dir);

    match &cli.command {
        Commands::Show(args) => show_namelist(args, &settings),
        Commands::Set(args) => set_variable(args, &settings),
        Commands::Remove(args) => remove_entry(args, &settings),
        Commands::Format(args) => format_namelist(args, &settings),
        Commands::Quantities(args) => list_quantities(args, &settings),
        Commands::Categories(args) => list_categories(args, &settings),
        Commands::AddOutputs(args) => add_outputs(args, &settings),
        Commands::Check(args) => check_outputs(args, &settings),
        Commands::Render(args) => render_formulas(args, &settings).map(|_| ()),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
