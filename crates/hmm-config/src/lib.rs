//! Gaussian HMM fit configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for fit.json
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Config snapshots recorded next to every fit result

pub mod fit;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use fit::{
    load_fit_config, ConvergenceConfig, FitConfig, LoadedConfig, VarianceUpdate, DEFAULT_MAX_ITER,
};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use snapshot::{ConfigSnapshot, ConfigSummary};
pub use validate::{validate_fit_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
