// rayleighrs/src/constants.rs

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_NAME: &str = "rayleighrs.yml";

/// Rayleigh checkout location below `$HOME` when none is configured.
pub const DEFAULT_RAYLEIGH_SUBDIR: [&str; 2] = ["Programs", "Rayleigh-Fork"];

/// Directory that receives rendered formulas when none is configured.
pub const DEFAULT_FORMULA_DIR: &str = "quantity_code_formulas";

/// Group holding the `<output>_values` lists.
pub const OUTPUT_GROUP: &str = "output_namelist";
