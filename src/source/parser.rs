//! Parser for the Prometheus text exposition format.
//!
//! Pure functions over `&str`, so they are tested with string inputs only.
//! Samples belonging to histogram and summary families are skipped: the
//! viewer only tracks plain gauge/counter/untyped values.

use std::collections::HashMap;

use crate::storage::Labels;

use super::{Observation, Snapshot};

/// Error type for malformed exposition text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, msg: impl Into<String>) -> Self {
        Self {
            line,
            message: msg.into(),
        }
    }
}

/// Metric family types declared by `# TYPE` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FamilyType {
    Counter,
    Gauge,
    Untyped,
    Histogram,
    GaugeHistogram,
    Summary,
}

impl FamilyType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "counter" => Some(Self::Counter),
            "gauge" => Some(Self::Gauge),
            "untyped" | "unknown" => Some(Self::Untyped),
            "histogram" => Some(Self::Histogram),
            "gaugehistogram" => Some(Self::GaugeHistogram),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }

    fn is_complex(self) -> bool {
        matches!(self, Self::Histogram | Self::GaugeHistogram | Self::Summary)
    }
}

const COMPLEX_SUFFIXES: &[&str] = &["_bucket", "_sum", "_count", "_gcount", "_gsum"];

/// Parses a full exposition payload into a snapshot.
pub fn parse_exposition(content: &str) -> Result<Snapshot, ParseError> {
    let mut types: HashMap<String, FamilyType> = HashMap::new();
    let mut snapshot = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if let Some((name, kind)) = parse_type_comment(comment) {
                let kind = FamilyType::parse(kind).ok_or_else(|| {
                    ParseError::new(line_no, format!("unknown metric type '{}'", kind))
                })?;
                types.insert(name.to_string(), kind);
            }
            continue;
        }

        let obs = parse_sample_line(line, line_no)?;
        if belongs_to_complex_family(&obs.name, &types) {
            continue;
        }
        snapshot.push(obs);
    }

    Ok(snapshot)
}

/// Returns `(metric, type)` for `# TYPE metric type` comments.
fn parse_type_comment(comment: &str) -> Option<(&str, &str)> {
    let mut parts = comment.split_whitespace();
    if parts.next()? != "TYPE" {
        return None;
    }
    let name = parts.next()?;
    let kind = parts.next()?;
    Some((name, kind))
}

fn belongs_to_complex_family(name: &str, types: &HashMap<String, FamilyType>) -> bool {
    if let Some(kind) = types.get(name) {
        return kind.is_complex();
    }
    COMPLEX_SUFFIXES.iter().any(|suffix| {
        name.strip_suffix(suffix)
            .and_then(|base| types.get(base))
            .is_some_and(|kind| kind.is_complex())
    })
}

/// Parses `name{k="v",...} value [timestamp]`.
fn parse_sample_line(line: &str, line_no: usize) -> Result<Observation, ParseError> {
    let name_end = line
        .find(|c: char| c == '{' || c.is_whitespace())
        .ok_or_else(|| ParseError::new(line_no, "missing value"))?;
    let name = &line[..name_end];
    if !is_valid_metric_name(name) {
        return Err(ParseError::new(
            line_no,
            format!("invalid metric name '{}'", name),
        ));
    }

    // Blanks may separate the name from the label block.
    let mut rest = line[name_end..].trim_start();
    let mut labels = Labels::new();
    if let Some(after_brace) = rest.strip_prefix('{') {
        let (parsed, remaining) = parse_labels(after_brace, line_no)?;
        labels = parsed;
        rest = remaining;
    }

    let mut fields = rest.split_whitespace();
    let value_str = fields
        .next()
        .ok_or_else(|| ParseError::new(line_no, "missing value"))?;
    let value = parse_value(value_str)
        .ok_or_else(|| ParseError::new(line_no, format!("invalid value '{}'", value_str)))?;

    if let Some(ts) = fields.next()
        && ts.parse::<i64>().is_err()
    {
        return Err(ParseError::new(
            line_no,
            format!("invalid timestamp '{}'", ts),
        ));
    }
    if fields.next().is_some() {
        return Err(ParseError::new(line_no, "trailing data after timestamp"));
    }

    Ok(Observation::new(name, labels, value))
}

/// Parses the label block after `{`, returning the labels and the text after `}`.
fn parse_labels(input: &str, line_no: usize) -> Result<(Labels, &str), ParseError> {
    let mut labels = Labels::new();
    let mut rest = input.trim_start();

    loop {
        if let Some(after) = rest.strip_prefix('}') {
            return Ok((labels, after));
        }

        let eq = rest
            .find('=')
            .ok_or_else(|| ParseError::new(line_no, "expected '=' in label"))?;
        let key = rest[..eq].trim();
        if !is_valid_label_name(key) {
            return Err(ParseError::new(
                line_no,
                format!("invalid label name '{}'", key),
            ));
        }

        let after_eq = rest[eq + 1..].trim_start();
        let quoted = after_eq
            .strip_prefix('"')
            .ok_or_else(|| ParseError::new(line_no, "label value must be quoted"))?;
        let (value, after_value) = unescape_quoted(quoted, line_no)?;
        if labels.insert(key.to_string(), value).is_some() {
            return Err(ParseError::new(
                line_no,
                format!("duplicate label '{}'", key),
            ));
        }

        rest = after_value.trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
        } else if !rest.starts_with('}') {
            return Err(ParseError::new(line_no, "expected ',' or '}' after label"));
        }
    }
}

/// Reads an escaped string up to the closing quote.
fn unescape_quoted(input: &str, line_no: usize) -> Result<(String, &str), ParseError> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &input[i + 1..])),
            '\\' => match chars.next() {
                Some((_, '\\')) => value.push('\\'),
                Some((_, '"')) => value.push('"'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            c => value.push(c),
        }
    }
    Err(ParseError::new(line_no, "unterminated label value"))
}

fn parse_value(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "+Inf" | "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => s.parse::<f64>().ok(),
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
