//! Syntactic stage: recover a JSON object from free model text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```[ \t]*json[ \t]*\r?\n?(.*?)```").expect("json fence pattern compiles"));
static ANY_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[ \t]*\r?\n?(.*?)```").expect("fence pattern compiles"));

/// Where the candidate object was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// No model output was supplied.
    Absent,
    JsonFence,
    Fence,
    WholeText,
    /// Substring from the first `{` to the last `}` of the raw text.
    BraceSlice,
    /// Nothing parseable; the candidate is empty.
    Unparseable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub candidate: Map<String, Value>,
    pub source: ExtractionSource,
}

impl Extraction {
    pub fn absent() -> Self {
        Self::empty(ExtractionSource::Absent)
    }

    fn empty(source: ExtractionSource) -> Self {
        Self {
            candidate: Map::new(),
            source,
        }
    }

    pub fn recovered(&self) -> bool {
        !matches!(self.source, ExtractionSource::Absent | ExtractionSource::Unparseable)
    }
}

/// Never fails: unparseable text yields an empty candidate.
pub fn extract_candidate(text: &str) -> Extraction {
    let (candidate_text, source) = isolate(text);
    if let Some(candidate) = parse_object(candidate_text) {
        return Extraction { candidate, source };
    }

    brace_slice(text)
        .and_then(parse_object)
        .map(|candidate| Extraction {
            candidate,
            source: ExtractionSource::BraceSlice,
        })
        .unwrap_or_else(|| Extraction::empty(ExtractionSource::Unparseable))
}

fn isolate(text: &str) -> (&str, ExtractionSource) {
    if let Some(inner) = JSON_FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        return (inner.as_str(), ExtractionSource::JsonFence);
    }
    if let Some(inner) = ANY_FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        return (inner.as_str(), ExtractionSource::Fence);
    }
    (text, ExtractionSource::WholeText)
}

fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Non-object JSON (arrays, scalars) is not a usable candidate.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
