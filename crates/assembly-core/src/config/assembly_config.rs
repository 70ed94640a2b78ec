//! Top-level assembly configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MiningConfig, ReductionConfig, SpectrumConfig};
use crate::errors::ConfigError;
use crate::types::modes::{MiningTarget, PreferenceRule, SurrogateMethod};

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`ASSEMBLY_*`)
/// 3. Project config (`assembly.toml` in project root)
/// 4. User config (`~/.assembly/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssemblyConfig {
    pub mining: MiningConfig,
    pub spectrum: SpectrumConfig,
    pub reduction: ReductionConfig,
}

/// Override arguments that can be applied to a config (e.g. from a CLI).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<MiningTarget>,
    pub min_support: Option<u64>,
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
    pub surrogate: Option<SurrogateMethod>,
    pub trials: Option<u64>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub rule: Option<PreferenceRule>,
}

impl AssemblyConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        ::tracing::debug!(error = %e, "user config unreadable, using defaults");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("assembly.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AssemblyConfig) -> Result<(), ConfigError> {
        let mining = &config.mining;
        if let Some(min_size) = mining.min_size {
            if min_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "mining.min_size".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if mining.effective_max_size() < mining.effective_min_size() {
            return Err(ConfigError::ValidationFailed {
                field: "mining.max_size".to_string(),
                message: format!(
                    "must not be below mining.min_size ({})",
                    mining.effective_min_size()
                ),
            });
        }
        if let Some(pct) = mining.min_support_percent {
            if !pct.is_finite() {
                return Err(ConfigError::ValidationFailed {
                    field: "mining.min_support_percent".to_string(),
                    message: "must be a finite number".to_string(),
                });
            }
        }

        let spectrum = &config.spectrum;
        if let Some(sigma) = spectrum.sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "spectrum.sigma".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if let Some(block_size) = spectrum.block_size {
            if !(block_size.is_finite() && block_size > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "spectrum.block_size".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if let Some(threshold) = spectrum.frequency_threshold {
            if !(threshold.is_finite() && threshold >= 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "spectrum.frequency_threshold".to_string(),
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.assembly/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut AssemblyConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AssemblyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut AssemblyConfig, other: &AssemblyConfig) {
        // Mining
        let (b, o) = (&mut base.mining, &other.mining);
        overlay(&mut b.target, o.target);
        overlay(&mut b.min_support, o.min_support);
        overlay(&mut b.min_support_percent, o.min_support_percent);
        overlay(&mut b.min_size, o.min_size);
        overlay(&mut b.max_size, o.max_size);

        // Spectrum
        let (b, o) = (&mut base.spectrum, &other.spectrum);
        overlay(&mut b.surrogate, o.surrogate);
        overlay(&mut b.surrogate_target, o.surrogate_target);
        overlay(&mut b.trials, o.trials);
        overlay(&mut b.seed, o.seed);
        overlay(&mut b.workers, o.workers);
        overlay(&mut b.density, o.density);
        overlay(&mut b.sigma, o.sigma);
        overlay(&mut b.block_size, o.block_size);
        overlay(&mut b.frequency_threshold, o.frequency_threshold);

        // Reduction
        let (b, o) = (&mut base.reduction, &other.reduction);
        overlay(&mut b.rule, o.rule);
        overlay(&mut b.synthesize_intersections, o.synthesize_intersections);
    }

    /// Apply environment variable overrides.
    /// Pattern: `ASSEMBLY_MINING_TARGET`, `ASSEMBLY_SPECTRUM_TRIALS`, etc.
    /// Unparsable values are rejected, never silently dropped.
    fn apply_env_overrides(config: &mut AssemblyConfig) -> Result<(), ConfigError> {
        env_value("ASSEMBLY_MINING_TARGET", &mut config.mining.target)?;
        env_value("ASSEMBLY_MINING_MIN_SUPPORT", &mut config.mining.min_support)?;
        env_value("ASSEMBLY_MINING_MIN_SIZE", &mut config.mining.min_size)?;
        env_value("ASSEMBLY_MINING_MAX_SIZE", &mut config.mining.max_size)?;
        env_value("ASSEMBLY_SPECTRUM_SURROGATE", &mut config.spectrum.surrogate)?;
        env_value("ASSEMBLY_SPECTRUM_TRIALS", &mut config.spectrum.trials)?;
        env_value("ASSEMBLY_SPECTRUM_SEED", &mut config.spectrum.seed)?;
        env_value("ASSEMBLY_SPECTRUM_WORKERS", &mut config.spectrum.workers)?;
        env_value("ASSEMBLY_REDUCTION_RULE", &mut config.reduction.rule)?;
        Ok(())
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut AssemblyConfig, overrides: &ConfigOverrides) {
        overlay(&mut config.mining.target, overrides.target);
        if overrides.min_support.is_some() {
            config.mining.min_support = overrides.min_support;
            config.mining.min_support_percent = None;
        }
        overlay(&mut config.mining.min_size, overrides.min_size);
        overlay(&mut config.mining.max_size, overrides.max_size);
        overlay(&mut config.spectrum.surrogate, overrides.surrogate);
        overlay(&mut config.spectrum.trials, overrides.trials);
        overlay(&mut config.spectrum.seed, overrides.seed);
        overlay(&mut config.spectrum.workers, overrides.workers);
        overlay(&mut config.reduction.rule, overrides.rule);
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn overlay<T: Clone>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

fn env_value<T: FromStr>(key: &str, slot: &mut Option<T>) -> Result<(), ConfigError>
where
    T::Err: std::fmt::Display,
{
    if let Ok(val) = std::env::var(key) {
        let parsed = val.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        *slot = Some(parsed);
    }
    Ok(())
}

/// Returns the user-level config directory: `~/.assembly/`.
fn dirs_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".assembly"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
