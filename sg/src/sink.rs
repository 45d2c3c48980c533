//! Progress reporting
//!
//! The generator never prints directly. It hands every progress line to a
//! [`ProgressSink`], so the binary can print to the console while tests record.

use colored::*;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A single progress notification
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A template is being copied to a density-specific output
    Copying { from: PathBuf, to: PathBuf },
    /// A placeholder token was resolved to a scaled value
    Replacing { token: String, value: String },
    /// A placeholder value could not be parsed; the default is used
    UnknownValue { token: String },
    /// A generated file was deleted by `clean`
    Removed { path: PathBuf },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Copying { from, to } => write!(f, "Copying {} -> {}", from.display(), to.display()),
            ProgressEvent::Replacing { token, value } => write!(f, "Replacing {} -> {}", token, value),
            ProgressEvent::UnknownValue { token } => write!(f, "Unknown value: {}", token),
            ProgressEvent::Removed { path } => write!(f, "Removed {}", path.display()),
        }
    }
}

/// Receiver for progress events
pub trait ProgressSink {
    fn report(&mut self, event: &ProgressEvent);
}

/// Prints progress lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Copying { from, to } => {
                println!("Copying {} -> {}", from.display().to_string().cyan(), to.display().to_string().cyan());
            }
            ProgressEvent::Replacing { token, value } => {
                println!("  Replacing {} -> {}", token.yellow(), value.green());
            }
            ProgressEvent::UnknownValue { token } => {
                println!("  {} {}", "Unknown value:".red(), token);
            }
            ProgressEvent::Removed { path } => {
                println!("{} Removed {}", "✓".green(), path.display());
            }
        }
    }
}

/// Forwards progress to `tracing` only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::UnknownValue { .. } => warn!("{}", event),
            ProgressEvent::Copying { .. } | ProgressEvent::Removed { .. } => info!("{}", event),
            ProgressEvent::Replacing { .. } => debug!("{}", event),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered progress lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        let event = ProgressEvent::Copying {
            from: PathBuf::from("general-template.json"),
            to: PathBuf::from("general-hdpi.json"),
        };
        assert_eq!(event.to_string(), "Copying general-template.json -> general-hdpi.json");

        let event = ProgressEvent::Replacing {
            token: "${10}".to_string(),
            value: "15".to_string(),
        };
        assert_eq!(event.to_string(), "Replacing ${10} -> 15");

        let event = ProgressEvent::UnknownValue {
            token: "${abc}".to_string(),
        };
        assert_eq!(event.to_string(), "Unknown value: ${abc}");
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.report(&ProgressEvent::Removed {
            path: PathBuf::from("a.json"),
        });
        sink.report(&ProgressEvent::Removed {
            path: PathBuf::from("b.json"),
        });
        assert_eq!(sink.lines(), vec!["Removed a.json", "Removed b.json"]);
    }
}
