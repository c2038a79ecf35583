// rayleighrs/src/config/mod.rs

pub mod settings;

pub use settings::{Settings, TexSettings};
