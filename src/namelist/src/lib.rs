// rayleighrs-namelist/src/lib.rs

//! Read, edit and write Rayleigh namelist input files.
//!
//! This library provides functionality to:
//! - Parse `&group ... /` namelist files into ordered Rust data structures
//! - Edit groups and variables, with replace-in-place or append semantics
//! - Write namelists back to text without ever clobbering a file by accident
//! - Maintain the `<output>_values` quantity code lists of the output namelist
//!
//! Comments and original whitespace are not preserved.

pub mod error;
pub mod namelist;
pub mod parser;

use std::io::Write;
use std::path::Path;

pub use error::{NamelistError, Result};
pub use namelist::{InsertMode, Namelist, NamelistGroup, OutputKind, Variable};
pub use parser::NamelistParser;

/// Indentation used when none is configured.
pub const DEFAULT_INDENT: &str = " ";

/// Parse a namelist from a file path.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), rayleighrs_namelist::NamelistError> {
///     let nml = rayleighrs_namelist::read("main_input")?;
///     println!("{}", nml);
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> Result<Namelist> {
    let contents = fs_err::read_to_string(path.as_ref())?;
    log::debug!("parsing namelist file {}", path.as_ref().display());
    reads(&contents)
}

/// Parse a namelist from a string.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), rayleighrs_namelist::NamelistError> {
///     let nml = rayleighrs_namelist::reads("&problemsize_namelist\n n_r = 64\n/\n")?;
///     assert!(nml.has_group("problemsize_namelist"));
///     Ok(())
/// }
/// ```
pub fn reads(content: &str) -> Result<Namelist> {
    NamelistParser::new(content).parse()
}

/// Write a namelist to a file that must not exist yet.
pub fn write<P: AsRef<Path>>(nml: &Namelist, path: P) -> Result<()> {
    write_with_options(nml, path, &WriteOptions::default())
}

/// Write a namelist to a file with specific options.
///
/// The text is rendered completely, and the target checked, before the file
/// is created; a failure leaves any existing file untouched.
pub fn write_with_options<P: AsRef<Path>>(
    nml: &Namelist,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();

    if !options.overwrite && path.exists() {
        return Err(NamelistError::WriteConflict(path.to_path_buf()));
    }

    let formatted = nml.to_namelist_string(&options.indent)?;

    let mut file = if options.overwrite {
        fs_err::File::create(path)?
    } else {
        // create_new closes the window between the check above and the open
        fs_err::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    NamelistError::WriteConflict(path.to_path_buf())
                }
                _ => NamelistError::Io(e),
            })?
    };

    log::info!("writing namelist to {}", path.display());
    file.write_all(formatted.as_bytes())?;
    Ok(())
}

/// Write a namelist to any writer implementing the Write trait.
pub fn write_to_writer<W: Write>(
    nml: &Namelist,
    writer: &mut W,
    options: &WriteOptions,
) -> Result<()> {
    let formatted = nml.to_namelist_string(&options.indent)?;
    writer.write_all(formatted.as_bytes())?;
    Ok(())
}

/// Options for controlling namelist output.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Permit replacing an existing file
    pub overwrite: bool,
    /// Indentation placed before every assignment; whitespace only
    pub indent: String,
}

impl WriteOptions {
    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

#[cfg(feature = "json")]
/// Convert a namelist to JSON string.
pub fn to_json(nml: &Namelist) -> Result<String> {
    serde_json::to_string_pretty(nml).map_err(NamelistError::from)
}

#[cfg(feature = "json")]
/// Parse a namelist from JSON string.
pub fn from_json(json: &str) -> Result<Namelist> {
    serde_json::from_str(json).map_err(NamelistError::from)
}

#[cfg(feature = "yaml")]
/// Convert a namelist to YAML string.
pub fn to_yaml(nml: &Namelist) -> Result<String> {
    serde_yaml::to_string(nml).map_err(NamelistError::from)
}

#[cfg(feature = "yaml")]
/// Parse a namelist from YAML string.
pub fn from_yaml(yaml: &str) -> Result<Namelist> {
    serde_yaml::from_str(yaml).map_err(NamelistError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Namelist {
        let mut nml = Namelist::new();
        nml.insert_group("problemsize_namelist")
            .set("n_r", ["64"])
            .set("n_theta", ["96"]);
        nml.insert_group("output_namelist")
            .set("shellslice_levels", ["0.5", "0.9"])
            .set("shellslice_values", ["1", "2", "3"]);
        nml
    }

    #[test]
    fn test_reads_simple() {
        let nml = reads("&data_nml\n x = 1\n y = 2.0,3.0\n/\n").unwrap();

        let group = nml.get_group("data_nml").unwrap();
        assert_eq!(group.get("x").unwrap().values(), &["1"]);
        assert_eq!(group.get("y").unwrap().values(), &["2.0", "3.0"]);
    }

    #[test]
    fn test_write_to_writer() {
        let mut output = Vec::new();
        write_to_writer(&sample(), &mut output, &WriteOptions::default()).unwrap();

        let result = String::from_utf8(output).unwrap();
        assert!(result.starts_with("&problemsize_namelist\n n_r = 64\n"));
        assert!(result.contains(" shellslice_levels = 0.5,0.9\n"));
        assert!(result.ends_with("/\n\n"));
    }

    #[test]
    fn test_roundtrip_preserves_everything() {
        let nml = sample();
        let text = nml.to_namelist_string(" ").unwrap();
        let reparsed = reads(&text).unwrap();
        assert_eq!(nml, reparsed);
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let first = sample().to_namelist_string(" ").unwrap();
        let second = reads(&first).unwrap().to_namelist_string(" ").unwrap();
        let third = reads(&second).unwrap().to_namelist_string(" ").unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_write_to_writer_bad_indent_writes_nothing() {
        let mut output = Vec::new();
        let options = WriteOptions::default().with_indent("..");
        let err = write_to_writer(&sample(), &mut output, &options).unwrap_err();

        assert!(matches!(err, NamelistError::FormatConfig { .. }));
        assert!(output.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_roundtrip() {
        let nml = sample();
        let json = to_json(&nml).unwrap();
        assert_eq!(nml, from_json(&json).unwrap());
    }
}
