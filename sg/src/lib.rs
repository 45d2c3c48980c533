//! SkinGen - density-specific UI skin generator
//!
//! Expands `<skin>-template.json` files into one file per screen density
//! bucket, scaling every `${<number>}` placeholder by the bucket multiplier.
//!
//! # Layout
//!
//! ```text
//! skins/
//! ├── general-template.json   # input, never modified
//! ├── general-mdpi.json       # ${n} * 1
//! ├── general-hdpi.json       # ${n} * 1.5
//! └── general-xhdpi.json      # ${n} * 2
//! ```
//!
//! # Example
//!
//! ```ignore
//! use skingen::{Config, ConsoleSink, SkinGenerator};
//!
//! let config = Config::default();
//! let generator = SkinGenerator::from_config(&config);
//! let report = generator.generate(&mut ConsoleSink)?;
//! println!("{} files written", report.outputs.len());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod scale;
pub mod sink;

pub use config::{Config, DensityBucket};
pub use error::SkinError;
pub use generator::{CheckResult, GenerateReport, GeneratedFile, SkinGenerator};
pub use scale::{Replacement, ScaleOptions, ScaleReport, format_scaled, scale_file, scale_text};
pub use sink::{ConsoleSink, ProgressEvent, ProgressSink, RecordingSink, TracingSink};

/// Suffix that marks a skin template file
pub const TEMPLATE_SUFFIX: &str = "-template";

/// Extension shared by templates and generated files
pub const SKIN_EXTENSION: &str = "json";

/// Opening marker of a placeholder token
pub const TOKEN_OPEN: &str = "${";

/// Closing marker of a placeholder token
pub const TOKEN_CLOSE: char = '}';

/// Value used when a placeholder cannot be parsed as a number
pub const UNKNOWN_VALUE_DEFAULT: f64 = 1.0;
