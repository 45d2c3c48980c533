//! Placeholder scaling
//!
//! A placeholder is `${<number>}`. Scaling replaces every placeholder with its
//! literal value multiplied by a density multiplier. The text is scanned once,
//! left to right, into a fresh buffer; a placeholder seen before reuses the value
//! computed for its first occurrence.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SkinError;
use crate::sink::{ProgressEvent, ProgressSink};
use crate::{TOKEN_CLOSE, TOKEN_OPEN, UNKNOWN_VALUE_DEFAULT};

/// Options for scaling
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleOptions {
    /// Fail on unparseable placeholder values instead of substituting the default
    pub strict: bool,
}

/// A distinct placeholder and the text it was replaced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub token: String,
    pub value: String,
}

/// Summary of one scaling pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleReport {
    /// Distinct placeholders in order of first appearance
    pub replacements: Vec<Replacement>,
    /// Total placeholders replaced, counting repeats
    pub occurrences: usize,
    /// Distinct placeholders that fell back to the default value
    pub unknown: usize,
}

/// Literal value inside a placeholder
#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal {
    Int(i64),
    Float(f64),
}

impl Literal {
    fn parse(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        if let Ok(n) = inner.parse::<i64>() {
            return Some(Literal::Int(n));
        }
        inner.parse::<f64>().ok().filter(|v| v.is_finite()).map(Literal::Float)
    }

    fn scale(self, multiplier: f64) -> f64 {
        match self {
            Literal::Int(n) => n as f64 * multiplier,
            Literal::Float(v) => v * multiplier,
        }
    }

    /// Exact integer product when both sides are integral and it fits
    fn scale_exact(self, multiplier: f64) -> Option<i64> {
        match self {
            Literal::Int(n) if multiplier.fract() == 0.0 && in_i64_range(multiplier) => {
                n.checked_mul(multiplier as i64)
            }
            _ => None,
        }
    }
}

fn in_i64_range(value: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Render a scaled value: integral values within `i64` range drop the
/// fractional part, anything else keeps its shortest float form.
pub fn format_scaled(value: f64) -> String {
    if value.fract() == 0.0 && in_i64_range(value) {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Replace every placeholder in `text` with its value times `multiplier`.
///
/// Returns the new text together with a report. The returned text never
/// contains the opening marker `${`.
pub fn scale_text(
    text: &str,
    multiplier: f64,
    options: ScaleOptions,
    sink: &mut dyn ProgressSink,
) -> Result<(String, ScaleReport), SkinError> {
    debug!(len = text.len(), multiplier, strict = options.strict, "scale_text: called");

    let mut out = String::with_capacity(text.len());
    let mut report = ScaleReport::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    let mut rest = text;
    let mut consumed = 0usize;

    while let Some(start) = rest.find(TOKEN_OPEN) {
        out.push_str(&rest[..start]);

        let candidate = &rest[start..];
        let Some(close) = candidate.find(TOKEN_CLOSE) else {
            let offset = consumed + start;
            return Err(SkinError::UnterminatedToken {
                offset,
                line: line_at(text, offset),
            });
        };
        let token = &candidate[..=close];

        let index = match seen.get(token) {
            Some(&index) => index,
            None => {
                let value = resolve(token, multiplier, options, sink, &mut report)?;
                sink.report(&ProgressEvent::Replacing {
                    token: token.to_string(),
                    value: value.clone(),
                });
                report.replacements.push(Replacement {
                    token: token.to_string(),
                    value,
                });
                seen.insert(token, report.replacements.len() - 1);
                report.replacements.len() - 1
            }
        };
        out.push_str(&report.replacements[index].value);
        report.occurrences += 1;

        let advance = start + close + TOKEN_CLOSE.len_utf8();
        rest = &rest[advance..];
        consumed += advance;
    }
    out.push_str(rest);

    debug!(
        distinct = report.replacements.len(),
        occurrences = report.occurrences,
        unknown = report.unknown,
        "scale_text: done"
    );
    Ok((out, report))
}

fn resolve(
    token: &str,
    multiplier: f64,
    options: ScaleOptions,
    sink: &mut dyn ProgressSink,
    report: &mut ScaleReport,
) -> Result<String, SkinError> {
    let inner = &token[TOKEN_OPEN.len()..token.len() - TOKEN_CLOSE.len_utf8()];

    let literal = match Literal::parse(inner) {
        Some(literal) => literal,
        None if options.strict => {
            return Err(SkinError::UnknownValue {
                token: token.to_string(),
            });
        }
        None => {
            warn!(%token, "Unknown value, using {}", UNKNOWN_VALUE_DEFAULT);
            sink.report(&ProgressEvent::UnknownValue {
                token: token.to_string(),
            });
            report.unknown += 1;
            Literal::Float(UNKNOWN_VALUE_DEFAULT)
        }
    };

    if let Some(exact) = literal.scale_exact(multiplier) {
        return Ok(exact.to_string());
    }

    let scaled = literal.scale(multiplier);
    if !scaled.is_finite() {
        return Err(SkinError::NonFiniteValue {
            token: token.to_string(),
            multiplier,
        });
    }
    Ok(format_scaled(scaled))
}

fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Scale the placeholders of the file at `path` in place.
///
/// On any template error the file is left untouched.
pub fn scale_file(
    path: &Path,
    multiplier: f64,
    options: ScaleOptions,
    sink: &mut dyn ProgressSink,
) -> Result<ScaleReport, SkinError> {
    debug!(path = %path.display(), multiplier, "scale_file: called");

    let content = fs::read_to_string(path).map_err(|source| SkinError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (scaled, report) = scale_text(&content, multiplier, options, sink)?;

    fs::write(path, scaled).map_err(|source| SkinError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn scale(text: &str, multiplier: f64) -> String {
        let mut sink = RecordingSink::new();
        scale_text(text, multiplier, ScaleOptions::default(), &mut sink).unwrap().0
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let text = "{\n  \"font\": \"default\",\n  \"color\": [1, 0.5, 0]\n}\n";
        assert_eq!(scale(text, 1.5), text);
    }

    #[test]
    fn test_scaling_values() {
        assert_eq!(scale("${10}", 1.5), "15");
        assert_eq!(scale("${3}", 2.0), "6");
        assert_eq!(scale("${3}", 1.5), "4.5");
        assert_eq!(scale("${2.5}", 2.0), "5");
        assert_eq!(scale("${0.25}", 1.5), "0.375");
        assert_eq!(scale("${-4}", 1.5), "-6");
        assert_eq!(scale("${7}", 1.0), "7");
    }

    #[test]
    fn test_integer_scaling_is_exact() {
        assert_eq!(scale("${9007199254740993}", 1.0), "9007199254740993");
        assert_eq!(scale("${4611686018427387903}", 2.0), "9223372036854775806");
    }

    #[test]
    fn test_repeated_placeholder_resolved_once() {
        let mut sink = RecordingSink::new();
        let (text, report) =
            scale_text("{\"pad\": ${5}, \"margin\": ${5}}", 2.0, ScaleOptions::default(), &mut sink).unwrap();

        assert_eq!(text, "{\"pad\": 10, \"margin\": 10}");
        assert_eq!(report.occurrences, 2);
        assert_eq!(
            report.replacements,
            vec![Replacement {
                token: "${5}".to_string(),
                value: "10".to_string()
            }]
        );
        assert_eq!(sink.lines(), vec!["Replacing ${5} -> 10"]);
    }

    #[test]
    fn test_replacement_events_follow_first_appearance() {
        let mut sink = RecordingSink::new();
        scale_text("${2} ${1} ${2} ${3}", 1.0, ScaleOptions::default(), &mut sink).unwrap();
        assert_eq!(
            sink.lines(),
            vec!["Replacing ${2} -> 2", "Replacing ${1} -> 1", "Replacing ${3} -> 3"]
        );
    }

    #[test]
    fn test_unknown_value_uses_default() {
        let mut sink = RecordingSink::new();
        let (text, report) = scale_text("{\"w\": ${abc}}", 2.0, ScaleOptions::default(), &mut sink).unwrap();

        assert_eq!(text, "{\"w\": 2}");
        assert_eq!(report.unknown, 1);
        assert_eq!(sink.lines(), vec!["Unknown value: ${abc}", "Replacing ${abc} -> 2"]);
    }

    #[test]
    fn test_empty_and_non_finite_literals_are_unknown() {
        assert_eq!(scale("${}", 1.5), "1.5");
        assert_eq!(scale("${NaN}", 2.0), "2");
        assert_eq!(scale("${inf}", 2.0), "2");
        assert_eq!(scale("${  }", 2.0), "2");
    }

    #[test]
    fn test_padded_literal_is_parsed() {
        let mut sink = RecordingSink::new();
        let (text, report) = scale_text("{\"w\": ${ 10 }, \"h\": ${\t0.5 }}", 1.5, ScaleOptions::default(), &mut sink).unwrap();

        assert_eq!(text, "{\"w\": 15, \"h\": 0.75}");
        assert_eq!(report.unknown, 0);
        assert_eq!(sink.lines(), vec!["Replacing ${ 10 } -> 15", "Replacing ${\t0.5 } -> 0.75"]);
    }

    #[test]
    fn test_strict_rejects_unknown_value() {
        let mut sink = RecordingSink::new();
        let err = scale_text("${12px}", 2.0, ScaleOptions { strict: true }, &mut sink).unwrap_err();
        assert!(matches!(err, SkinError::UnknownValue { ref token } if token == "${12px}"));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_unterminated_placeholder_fails() {
        let mut sink = RecordingSink::new();
        // the trailing brace closes "${2\n", so this one is terminated
        let (text, report) =
            scale_text("{\n  \"a\": ${1},\n  \"b\": ${2\n}", 2.0, ScaleOptions::default(), &mut sink).unwrap();
        assert_eq!(text, "{\n  \"a\": 2,\n  \"b\": 4");
        assert_eq!(report.unknown, 0);

        let err = scale_text("ok ${1}\nbad ${2", 2.0, ScaleOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(err, SkinError::UnterminatedToken { offset: 12, line: 2 }));
    }

    #[test]
    fn test_overflow_fails() {
        let mut sink = RecordingSink::new();
        let err = scale_text("${1e308}", 10.0, ScaleOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(err, SkinError::NonFiniteValue { .. }));
    }

    #[test]
    fn test_nested_marker_takes_first_closing_brace() {
        // "${${3}" is one token with an unparseable inner value
        assert_eq!(scale("${${3}}", 2.0), "2}");
    }

    #[test]
    fn test_format_scaled() {
        assert_eq!(format_scaled(30.0), "30");
        assert_eq!(format_scaled(-0.0), "0");
        assert_eq!(format_scaled(4.5), "4.5");
        assert_eq!(format_scaled(1e20), "100000000000000000000");
    }

    #[test]
    fn test_scale_file_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("general-hdpi.json");
        fs::write(&path, "{\"size\": ${20}}").unwrap();

        let mut sink = RecordingSink::new();
        let report = scale_file(&path, 1.5, ScaleOptions::default(), &mut sink).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"size\": 30}");
        assert_eq!(report.occurrences, 1);
    }

    #[test]
    fn test_scale_file_leaves_file_on_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("game-xhdpi.json");
        fs::write(&path, "{\"size\": ${20").unwrap();

        let mut sink = RecordingSink::new();
        assert!(scale_file(&path, 2.0, ScaleOptions::default(), &mut sink).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"size\": ${20");
    }

    #[test]
    fn test_scale_file_missing() {
        let temp = TempDir::new().unwrap();
        let mut sink = RecordingSink::new();
        let err = scale_file(&temp.path().join("nope.json"), 2.0, ScaleOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(err, SkinError::Read { .. }));
    }

    proptest! {
        #[test]
        fn prop_output_has_no_placeholders(
            parts in proptest::collection::vec(("[a-z :,\"{}\\n]{0,8}", -1000i64..1000, any::<bool>()), 0..16),
            multiplier in prop_oneof![Just(1.0), Just(1.5), Just(2.0), Just(0.75)],
        ) {
            let mut text = String::new();
            let mut distinct = std::collections::HashSet::new();
            for (filler, value, as_float) in &parts {
                text.push_str(filler);
                let token = if *as_float { format!("${{{}.5}}", value) } else { format!("${{{}}}", value) };
                distinct.insert(token.clone());
                text.push_str(&token);
            }

            let mut sink = RecordingSink::new();
            let (out, report) = scale_text(&text, multiplier, ScaleOptions::default(), &mut sink).unwrap();

            prop_assert!(!out.contains(TOKEN_OPEN));
            prop_assert!(report.replacements.len() <= distinct.len());
            prop_assert_eq!(report.occurrences, parts.len());
            prop_assert_eq!(report.unknown, 0);
        }
    }
}
