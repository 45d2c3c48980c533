//! Skin generation
//!
//! For every skin and every density bucket, copies `<skin>-template.json` to
//! `<skin><suffix>.json` and scales the copy's placeholders in place.

use eyre::{Result, WrapErr};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{Config, DensityBucket, validate_layout};
use crate::error::SkinError;
use crate::scale::{ScaleOptions, ScaleReport, scale_file, scale_text};
use crate::sink::{ProgressEvent, ProgressSink};
use crate::{SKIN_EXTENSION, TEMPLATE_SUFFIX};

/// One generated output file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub skin: String,
    pub suffix: String,
    pub path: PathBuf,
    pub report: ScaleReport,
}

/// Result of a full generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub outputs: Vec<GeneratedFile>,
}

impl GenerateReport {
    /// Total placeholders replaced across all outputs
    pub fn occurrences(&self) -> usize {
        self.outputs.iter().map(|o| o.report.occurrences).sum()
    }

    /// Total unknown-value fallbacks across all outputs
    pub fn unknown(&self) -> usize {
        self.outputs.iter().map(|o| o.report.unknown).sum()
    }
}

/// Dry-run result for one skin/bucket pair
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub skin: String,
    pub suffix: String,
    pub report: ScaleReport,
}

/// Generates density-specific skin files from templates
#[derive(Debug, Clone)]
pub struct SkinGenerator {
    dir: PathBuf,
    skins: Vec<String>,
    densities: Vec<DensityBucket>,
    options: ScaleOptions,
}

impl SkinGenerator {
    pub fn new(dir: impl Into<PathBuf>, skins: Vec<String>, densities: Vec<DensityBucket>) -> Self {
        Self {
            dir: dir.into(),
            skins,
            densities,
            options: ScaleOptions::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dir.clone(), config.skins.clone(), config.densities.clone())
            .with_options(ScaleOptions { strict: config.strict })
    }

    pub fn with_options(mut self, options: ScaleOptions) -> Self {
        self.options = options;
        self
    }

    /// `<dir>/<skin>-template.json`
    pub fn template_path(&self, skin: &str) -> PathBuf {
        self.dir.join(format!("{}{}.{}", skin, TEMPLATE_SUFFIX, SKIN_EXTENSION))
    }

    /// `<dir>/<skin><suffix>.json`
    pub fn output_path(&self, skin: &str, bucket: &DensityBucket) -> PathBuf {
        self.dir.join(format!("{}{}.{}", skin, bucket.suffix, SKIN_EXTENSION))
    }

    /// Generate every skin for every density bucket
    ///
    /// Skin names and suffixes are validated first, so a bad layout never
    /// touches the filesystem. Stops at the first error; outputs finished
    /// before it are kept, the one in progress is removed.
    pub fn generate(&self, sink: &mut dyn ProgressSink) -> Result<GenerateReport> {
        debug!(dir = %self.dir.display(), skins = self.skins.len(), densities = self.densities.len(), "generate: called");
        validate_layout(&self.skins, &self.densities)?;
        let mut report = GenerateReport::default();

        for skin in &self.skins {
            let template = self.template_path(skin);
            if !template.is_file() {
                return Err(SkinError::Read {
                    path: template,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "template not found"),
                }
                .into());
            }

            for bucket in &self.densities {
                let output = self.output_path(skin, bucket);
                let scaled = self
                    .generate_one(&template, &output, bucket, sink)
                    .wrap_err_with(|| format!("Failed to generate {}", output.display()))?;

                report.outputs.push(GeneratedFile {
                    skin: skin.clone(),
                    suffix: bucket.suffix.clone(),
                    path: output,
                    report: scaled,
                });
            }
        }

        info!(
            outputs = report.outputs.len(),
            occurrences = report.occurrences(),
            unknown = report.unknown(),
            "Generation complete"
        );
        Ok(report)
    }

    fn generate_one(
        &self,
        template: &Path,
        output: &Path,
        bucket: &DensityBucket,
        sink: &mut dyn ProgressSink,
    ) -> Result<ScaleReport, SkinError> {
        sink.report(&ProgressEvent::Copying {
            from: template.to_path_buf(),
            to: output.to_path_buf(),
        });

        // fs::copy carries the permission bits over
        fs::copy(template, output).map_err(|source| SkinError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        scale_file(output, bucket.multiplier, self.options, sink).inspect_err(|_| {
            // an unscaled copy must not survive a failed run
            if let Err(remove_err) = fs::remove_file(output) {
                warn!(path = %output.display(), error = %remove_err, "Failed to remove partial output");
            }
        })
    }

    /// Scale every template in memory without writing anything
    pub fn check(&self, sink: &mut dyn ProgressSink) -> Result<Vec<CheckResult>> {
        debug!(dir = %self.dir.display(), "check: called");
        validate_layout(&self.skins, &self.densities)?;
        let mut results = Vec::new();

        for skin in &self.skins {
            let template = self.template_path(skin);
            let content = fs::read_to_string(&template).map_err(|source| SkinError::Read {
                path: template.clone(),
                source,
            })?;

            for bucket in &self.densities {
                let (_, report) = scale_text(&content, bucket.multiplier, self.options, sink)
                    .wrap_err_with(|| format!("Invalid template {} for {}", template.display(), bucket.suffix))?;
                results.push(CheckResult {
                    skin: skin.clone(),
                    suffix: bucket.suffix.clone(),
                    report,
                });
            }
        }

        Ok(results)
    }

    /// Delete generated outputs; templates are never touched
    pub fn clean(&self, sink: &mut dyn ProgressSink) -> Result<Vec<PathBuf>> {
        debug!(dir = %self.dir.display(), "clean: called");
        validate_layout(&self.skins, &self.densities)?;
        let mut removed = Vec::new();

        for skin in &self.skins {
            for bucket in &self.densities {
                let output = self.output_path(skin, bucket);
                if output.is_file() {
                    fs::remove_file(&output).wrap_err_with(|| format!("Failed to remove {}", output.display()))?;
                    sink.report(&ProgressEvent::Removed { path: output.clone() });
                    removed.push(output);
                }
            }
        }

        info!(removed = removed.len(), "Clean complete");
        Ok(removed)
    }
}
