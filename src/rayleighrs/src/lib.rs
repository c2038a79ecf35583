// rayleighrs/src/lib.rs

pub mod cli;
pub mod config;
pub mod constants;

// Re-export commonly used types
pub use config::Settings;
