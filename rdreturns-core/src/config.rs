//! Configuration file support for rdreturns
//!
//! Loads starting parameters and interpretation thresholds from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.rdreturnsrc.json` in the working directory
//! 3. `rdreturns.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::interpret::InterpretationThresholds;
use crate::presets::{PrivateOverride, PrivatePreset, PublicOverride, PublicPreset};
use crate::private::{PrivateField, PrivateRdParams};
use crate::public::{PublicField, PublicRdParams};
use crate::session::Calculator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// rdreturns configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RdReturnsConfig {
    /// Private preset applied before the `private` overrides
    #[serde(default)]
    pub private_preset: Option<String>,

    /// Partial private parameters (default: Lucking et al. values)
    #[serde(default)]
    pub private: Option<PrivateOverride>,

    /// Public preset applied before the `public` overrides
    #[serde(default)]
    pub public_preset: Option<String>,

    /// Partial public parameters
    #[serde(default)]
    pub public: Option<PublicOverride>,

    /// Custom interpretation band thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Directory holding the toolkit YAML documents
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Custom interpretation band thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Below this BCR investment does not cover its costs (default: 1.0)
    pub modest: Option<f64>,
    /// Start of the good band (default: 2.0)
    pub good: Option<f64>,
    /// Start of the excellent band for private BCRs (default: 3.0)
    pub private_excellent: Option<f64>,
    /// Start of the excellent band for total public BCRs (default: 4.0)
    pub public_excellent: Option<f64>,
}

impl ThresholdConfig {
    fn resolve(&self) -> InterpretationThresholds {
        let d = InterpretationThresholds::default();
        InterpretationThresholds {
            modest: self.modest.unwrap_or(d.modest),
            good: self.good.unwrap_or(d.good),
            private_excellent: self.private_excellent.unwrap_or(d.private_excellent),
            public_excellent: self.public_excellent.unwrap_or(d.public_excellent),
        }
    }
}

/// Resolved configuration ready to seed a calculator session
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub private_params: PrivateRdParams,
    pub public_params: PublicRdParams,
    pub thresholds: InterpretationThresholds,
    /// Toolkit data directory, if configured
    pub data_dir: Option<PathBuf>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl RdReturnsConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.private_preset {
            name.parse::<PrivatePreset>()
                .map_err(anyhow::Error::msg)
                .context("invalid private_preset")?;
        }
        if let Some(ref name) = self.public_preset {
            name.parse::<PublicPreset>()
                .map_err(anyhow::Error::msg)
                .context("invalid public_preset")?;
        }

        if let Some(ref p) = self.private {
            for (name, v) in p.entries() {
                if !v.is_finite() {
                    anyhow::bail!("private.{} must be a finite number (got {})", name, v);
                }
                if let Ok(field) = name.parse::<PrivateField>() {
                    warn_outside_hint("private", name, v, field.hint_range());
                }
            }
        }
        if let Some(ref p) = self.public {
            for (name, v) in p.entries() {
                if !v.is_finite() {
                    anyhow::bail!("public.{} must be a finite number (got {})", name, v);
                }
                if let Ok(field) = name.parse::<PublicField>() {
                    warn_outside_hint("public", name, v, field.hint_range());
                }
            }
        }

        // Thresholds must be positive and ordered
        if let Some(ref t) = self.thresholds {
            let r = t.resolve();
            for (name, v) in [
                ("modest", r.modest),
                ("good", r.good),
                ("private_excellent", r.private_excellent),
                ("public_excellent", r.public_excellent),
            ] {
                if !v.is_finite() || v <= 0.0 {
                    anyhow::bail!("thresholds.{} must be positive (got {})", name, v);
                }
            }
            if r.modest >= r.good {
                anyhow::bail!(
                    "thresholds.modest ({}) must be less than thresholds.good ({})",
                    r.modest,
                    r.good
                );
            }
            for (name, v) in [
                ("private_excellent", r.private_excellent),
                ("public_excellent", r.public_excellent),
            ] {
                if r.good >= v {
                    anyhow::bail!(
                        "thresholds.good ({}) must be less than thresholds.{} ({})",
                        r.good,
                        name,
                        v
                    );
                }
            }
        }

        Ok(())
    }

    /// Resolve config into starting parameters and thresholds
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let mut private_params = PrivateRdParams::default();
        if let Some(ref name) = self.private_preset {
            let preset = name.parse::<PrivatePreset>().map_err(anyhow::Error::msg)?;
            private_params = preset.apply(&private_params);
        }
        if let Some(ref p) = self.private {
            private_params = p.merge(&private_params);
        }

        let mut public_params = PublicRdParams::default();
        if let Some(ref name) = self.public_preset {
            let preset = name.parse::<PublicPreset>().map_err(anyhow::Error::msg)?;
            public_params = preset.apply(&public_params);
        }
        if let Some(ref p) = self.public {
            public_params = p.merge(&public_params);
        }

        let thresholds = match &self.thresholds {
            Some(t) => t.resolve(),
            None => InterpretationThresholds::default(),
        };

        Ok(ResolvedConfig {
            private_params,
            public_params,
            thresholds,
            data_dir: self.data_dir.clone(),
            config_path: None,
        })
    }
}

fn warn_outside_hint(section: &str, name: &str, value: f64, (min, max): (f64, f64)) {
    if value < min || value > max {
        warn!(
            field = %format!("{}.{}", section, name),
            value,
            min,
            max,
            "config value outside the usual input range"
        );
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        RdReturnsConfig::default().resolve()
    }

    /// Fresh calculator session seeded from this config
    pub fn calculator(&self) -> Calculator {
        Calculator::with_thresholds(self.private_params, self.public_params, self.thresholds)
    }
}

/// Discover and load a config file from the working directory
///
/// Search order:
/// 1. `.rdreturnsrc.json`
/// 2. `rdreturns.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(RdReturnsConfig, PathBuf)>> {
    for name in [".rdreturnsrc.json", "rdreturns.config.json"] {
        let path = root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<RdReturnsConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: RdReturnsConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;
    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from `root`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (RdReturnsConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
