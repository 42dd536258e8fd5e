//! Session text format.
//!
//! The encoder builds the text by hand so output is byte-for-byte
//! deterministic. The decoder is a permissive scanner rather than a full
//! parser: it looks up known keys, tolerates missing or damaged pieces and
//! drops whatever it cannot read.

use crate::metrics::store::StoreSnapshot;
use crate::session::{Mark, Sample, SeriesKind, Session, DEFAULT_INTERVAL_MS, SESSION_VERSION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use strum::IntoEnumIterator;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?[0-9]+(\.[0-9]+)?").unwrap());

static MARK_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r#""t"\s*:\s*(-?[0-9]+)"#).unwrap());

static MARK_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""label"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());

pub fn export(started_at: i64, interval_ms: u64, snapshot: &StoreSnapshot) -> String {
    let mut out = String::with_capacity(256);

    let _ = write!(
        out,
        "{{\"version\":{},\"startedAt\":{},\"intervalMs\":{},\"series\":{{",
        SESSION_VERSION, started_at, interval_ms
    );

    for (i, kind) in SeriesKind::iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "\"{}\":", kind.key());
        write_pairs(&mut out, snapshot.series(kind));
    }

    out.push_str("},\"marks\":[");
    for (i, mark) in snapshot.marks.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(
            out,
            "{{\"t\":{},\"label\":\"{}\"}}",
            mark.timestamp,
            escape(&mark.label)
        );
    }
    out.push_str("]}");

    out
}

fn write_pairs(out: &mut String, samples: &[Sample]) {
    out.push('[');
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "[{},{}]", sample.timestamp, sample.value);
    }
    out.push(']');
}

/// Decodes session text. Returns `None` when the text does not have the
/// outline of a session at all; individual samples or marks that cannot be
/// read are skipped.
pub fn import(text: &str) -> Option<Session> {
    let cleaned = text.trim();
    if !cleaned.starts_with('{') || !cleaned.ends_with('}') || !cleaned.contains("\"series\"") {
        tracing::debug!(len = text.len(), "input does not look like a session");
        return None;
    }

    let version = number_after(cleaned, "\"version\"")
        .map(|v| v as u32)
        .unwrap_or(SESSION_VERSION);
    let started_at = number_after(cleaned, "\"startedAt\"")
        .map(|v| v as i64)
        .unwrap_or(0);
    let interval_ms = number_after(cleaned, "\"intervalMs\"")
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(DEFAULT_INTERVAL_MS);

    let series = SeriesKind::iter()
        .map(|kind| (kind, pairs_after(cleaned, &format!("\"{}\"", kind.key()))))
        .collect();

    let marks = marks_array(cleaned);

    Some(Session {
        version,
        started_at,
        interval_ms,
        series,
        marks,
    })
}

fn number_after(text: &str, key: &str) -> Option<f64> {
    let idx = text.find(key)?;
    let colon = idx + text[idx..].find(':')?;
    let token = NUMBER.find(&text[colon + 1..])?;
    token.as_str().parse().ok()
}

fn pairs_after(text: &str, key: &str) -> Vec<Sample> {
    let Some(idx) = text.find(key) else {
        return Vec::new();
    };
    let Some(start) = text[idx..].find('[').map(|i| idx + i) else {
        return Vec::new();
    };

    let mut depth = 0usize;
    let mut end = None;
    for (i, c) in text[start..].char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(end) = end else {
        return Vec::new();
    };

    let content = &text[start + 1..end];
    if content.trim().is_empty() {
        return Vec::new();
    }

    content
        .split("],")
        .filter_map(|segment| {
            let mut numbers = NUMBER.find_iter(segment).map(|m| m.as_str());
            let timestamp = numbers.next()?.parse::<i64>().ok()?;
            let value = numbers.next()?.parse::<f64>().ok()?;
            Some(Sample::new(timestamp, value))
        })
        .collect()
}

fn marks_array(text: &str) -> Vec<Mark> {
    let Some(idx) = text.find("\"marks\"") else {
        return Vec::new();
    };
    let Some(start) = text[idx..].find('[').map(|i| idx + i) else {
        return Vec::new();
    };
    let Some(end) = text[start + 1..].find(']').map(|i| start + 1 + i) else {
        return Vec::new();
    };

    let content = &text[start + 1..end];
    if content.trim().is_empty() {
        return Vec::new();
    }

    content
        .split("},")
        .filter_map(|segment| {
            let timestamp = MARK_TIME
                .captures(segment)?
                .get(1)?
                .as_str()
                .parse::<i64>()
                .ok()?;
            let label = MARK_LABEL.captures(segment)?.get(1)?.as_str();
            Some(Mark::new(timestamp, unescape(label)))
        })
        .collect()
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
