//! SkinGen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::TEMPLATE_SUFFIX;
use crate::error::SkinError;

/// Project-local config file name
pub const LOCAL_CONFIG: &str = ".skingen.yml";

/// A target screen density: output filename suffix and scale multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBucket {
    /// Appended to the skin name, e.g. "-hdpi"
    pub suffix: String,

    /// Factor applied to every placeholder value
    pub multiplier: f64,
}

impl DensityBucket {
    pub fn new(suffix: impl Into<String>, multiplier: f64) -> Self {
        Self {
            suffix: suffix.into(),
            multiplier,
        }
    }
}

/// Main SkinGen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding templates and generated files
    pub dir: PathBuf,

    /// Fail on unparseable placeholder values instead of substituting 1
    pub strict: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Logical skin names; each needs a `<skin>-template.json`
    pub skins: Vec<String>,

    /// Density buckets, generated in this order
    pub densities: Vec<DensityBucket>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            strict: false,
            log_level: None,
            skins: vec!["general".to_string(), "editor".to_string(), "game".to_string()],
            densities: vec![
                DensityBucket::new("-mdpi", 1.0),
                DensityBucket::new("-hdpi", 1.5),
                DensityBucket::new("-xhdpi", 2.0),
            ],
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full `load` reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .and_then(|config| config.log_level)
    }

    /// Project-local config first, then the user config directory
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("skingen").join("skingen.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration before use
    pub fn validate(&self) -> Result<(), SkinError> {
        validate_layout(&self.skins, &self.densities)
    }

    /// Restrict to the named skins and density suffixes; empty keeps everything
    pub fn select(&self, skins: &[String], suffixes: &[String]) -> Result<Self, SkinError> {
        let mut selected = self.clone();

        if !skins.is_empty() {
            if let Some(unknown) = skins.iter().find(|s| !self.skins.contains(s)) {
                return Err(SkinError::InvalidConfig(format!("unknown skin '{}'", unknown)));
            }
            selected.skins.retain(|s| skins.contains(s));
        }

        if !suffixes.is_empty() {
            if let Some(unknown) = suffixes
                .iter()
                .find(|s| !self.densities.iter().any(|b| &b.suffix == *s))
            {
                return Err(SkinError::InvalidConfig(format!("unknown density '{}'", unknown)));
            }
            selected.densities.retain(|b| suffixes.contains(&b.suffix));
        }

        Ok(selected)
    }
}

/// Check skin names and density buckets before any file is touched
///
/// Rejects names that would escape the skin directory and suffixes that would
/// make an output path collide with a template or with another output.
pub fn validate_layout(skins: &[String], densities: &[DensityBucket]) -> Result<(), SkinError> {
    for skin in skins {
        if skin.is_empty() {
            return Err(SkinError::InvalidConfig("skin name must not be empty".to_string()));
        }
        if skin.contains(['/', '\\']) {
            return Err(SkinError::InvalidConfig(format!(
                "skin name '{}' must not contain a path separator",
                skin
            )));
        }
    }

    let mut suffixes = HashSet::new();
    for bucket in densities {
        if !bucket.multiplier.is_finite() || bucket.multiplier <= 0.0 {
            return Err(SkinError::InvalidConfig(format!(
                "density '{}' has multiplier {}, expected a positive number",
                bucket.suffix, bucket.multiplier
            )));
        }
        if bucket.suffix == TEMPLATE_SUFFIX {
            return Err(SkinError::InvalidConfig(format!(
                "density suffix '{}' would overwrite the templates",
                TEMPLATE_SUFFIX
            )));
        }
        if bucket.suffix.contains(['/', '\\']) {
            return Err(SkinError::InvalidConfig(format!(
                "density suffix '{}' must not contain a path separator",
                bucket.suffix
            )));
        }
        if !suffixes.insert(bucket.suffix.as_str()) {
            return Err(SkinError::InvalidConfig(format!(
                "density suffix '{}' is listed twice",
                bucket.suffix
            )));
        }
    }
    Ok(())
}
