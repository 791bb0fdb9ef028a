//! Fit configuration types (fit.json).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::resolve::resolve_config;
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_fit_config, ValidationError, ValidationResult};

/// Number of EM iterations when nothing else is configured.
pub const DEFAULT_MAX_ITER: usize = 100;

/// Which mean the standard-deviation update is centred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceUpdate {
    /// Deviations from the mean that entered the iteration.
    #[default]
    PreviousMean,
    /// Deviations from the mean re-estimated in the same iteration (textbook EM).
    UpdatedMean,
}

impl std::str::FromStr for VarianceUpdate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "previous_mean" | "previous" | "stale" => Ok(VarianceUpdate::PreviousMean),
            "updated_mean" | "updated" | "textbook" => Ok(VarianceUpdate::UpdatedMean),
            _ => Err(format!("unknown variance update mode: {}", s)),
        }
    }
}

impl std::fmt::Display for VarianceUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarianceUpdate::PreviousMean => write!(f, "previous_mean"),
            VarianceUpdate::UpdatedMean => write!(f, "updated_mean"),
        }
    }
}

/// Opt-in early stopping on the sequence log-likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Stop once |ll_k - ll_{k-1}| falls below this value.
    pub tolerance: f64,
}

/// EM fit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Schema version of this file.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Number of EM iterations to run.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Standard-deviation update mode.
    #[serde(default)]
    pub variance_update: VarianceUpdate,

    /// Early stopping; absent means run exactly `max_iter` iterations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence: Option<ConvergenceConfig>,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            schema_version: default_schema_version(),
            max_iter: DEFAULT_MAX_ITER,
            variance_update: VarianceUpdate::PreviousMean,
            convergence: None,
        }
    }
}

impl FitConfig {
    /// Load fit config from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse fit config from a JSON string.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Override the iteration count.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Override the standard-deviation update mode.
    pub fn with_variance_update(mut self, mode: VarianceUpdate) -> Self {
        self.variance_update = mode;
        self
    }

    /// Enable early stopping with the given log-likelihood tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence = Some(ConvergenceConfig { tolerance });
        self
    }
}

/// A validated config together with the snapshot describing where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FitConfig,
    pub snapshot: ConfigSnapshot,
}

/// Resolve, read and validate the fit configuration.
///
/// Falls back to [`FitConfig::default`] when no file is found.
pub fn load_fit_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let resolved = resolve_config(cli_path);

    let (config, raw) = match resolved.path.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            (FitConfig::from_json(&raw)?, raw)
        }
        None => {
            let config = FitConfig::default();
            let raw = config
                .to_json()
                .map_err(|e| ValidationError::ParseError(e.to_string()))?;
            (config, raw)
        }
    };

    validate_fit_config(&config)?;
    let snapshot = ConfigSnapshot::new(&config, &resolved, &raw);

    Ok(LoadedConfig { config, snapshot })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FitConfig::default();
        assert_eq!(config.max_iter, 100);
        assert_eq!(config.variance_update, VarianceUpdate::PreviousMean);
        assert!(config.convergence.is_none());
        assert_eq!(config.schema_version, crate::CONFIG_SCHEMA_VERSION);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = FitConfig::from_json("{}").unwrap();
        assert_eq!(config, FitConfig::default());
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "schema_version": "1.0.0",
            "max_iter": 25,
            "variance_update": "updated_mean",
            "convergence": { "tolerance": 1e-8 }
        }"#;
        let config = FitConfig::from_json(json).unwrap();
        assert_eq!(config.max_iter, 25);
        assert_eq!(config.variance_update, VarianceUpdate::UpdatedMean);
        assert_eq!(config.convergence, Some(ConvergenceConfig { tolerance: 1e-8 }));
    }

    #[test]
    fn test_parse_error() {
        let err = FitConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_unknown_variance_mode_rejected() {
        let err = FitConfig::from_json(r#"{"variance_update": "median"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_variance_update_from_str() {
        assert_eq!(
            "previous-mean".parse::<VarianceUpdate>().unwrap(),
            VarianceUpdate::PreviousMean
        );
        assert_eq!(
            "textbook".parse::<VarianceUpdate>().unwrap(),
            VarianceUpdate::UpdatedMean
        );
        assert!("median".parse::<VarianceUpdate>().is_err());
        assert_eq!(VarianceUpdate::UpdatedMean.to_string(), "updated_mean");
    }

    #[test]
    fn test_builder() {
        let config = FitConfig::default()
            .with_max_iter(7)
            .with_variance_update(VarianceUpdate::UpdatedMean)
            .with_tolerance(1e-6);
        assert_eq!(config.max_iter, 7);
        assert_eq!(config.variance_update, VarianceUpdate::UpdatedMean);
        assert_eq!(config.convergence.map(|c| c.tolerance), Some(1e-6));
    }

    #[test]
    fn test_json_roundtrip_omits_absent_convergence() {
        let json = FitConfig::default().to_json().unwrap();
        assert!(!json.contains("convergence"));
        assert_eq!(FitConfig::from_json(&json).unwrap(), FitConfig::default());
    }
}
