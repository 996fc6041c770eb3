//! Semantic stage: coerce, default and clamp candidate fields one by one.

use serde_json::{Map, Value};
use std::{collections::BTreeMap, str::FromStr};
use strum::IntoEnumIterator;

use crate::{
    model::{Criteria, Criterion, Decision, RiskLevel},
    normalizer::aliases::{
        CRITERIA_CONTAINERS, DECISION_ALIASES, OVERALL_SCORE_ALIASES, RISK_LEVEL_ALIASES,
        criterion_aliases,
    },
};

/// Lenient numeric reading. `None` stands for "not a finite number".
///
/// Strings keep only digits, `.` and `-`, so `"80%"` reads as 80. What remains
/// is read up to its longest parseable prefix: `"10-20"` is 10, `"1.2.3"` is 1.2.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            // ASCII only, so every byte index is a char boundary.
            (1..=digits.len())
                .rev()
                .find_map(|end| digits[..end].parse::<f64>().ok())
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|n| n.is_finite())
}

/// Clamps to [0,100] and rounds to the nearest integer.
pub fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

/// First alias present with a non-null value.
fn lookup<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| object.get(*alias))
        .find(|value| !value.is_null())
}

fn criteria_source(candidate: &Map<String, Value>) -> &Map<String, Value> {
    CRITERIA_CONTAINERS
        .iter()
        .find_map(|name| candidate.get(*name).and_then(Value::as_object))
        .unwrap_or(candidate)
}

/// Reconciled criteria plus the number of axes the candidate actually supplied.
/// Missing or non-numeric axes read as 0.
pub fn reconcile_criteria(candidate: &Map<String, Value>) -> (Criteria, usize) {
    let source = criteria_source(candidate);
    let mut criteria = Criteria::default();
    let mut supplied = 0;

    for criterion in Criterion::iter() {
        if let Some(value) = lookup(source, criterion_aliases(criterion)) {
            supplied += 1;
            criteria.set(criterion, coerce_number(value).map(clamp_score).unwrap_or(0));
        }
    }

    (criteria, supplied)
}

/// `None` when the candidate carries no finite overall score.
pub fn reconcile_overall_score(candidate: &Map<String, Value>) -> Option<u8> {
    lookup(candidate, OVERALL_SCORE_ALIASES)
        .and_then(coerce_number)
        .map(clamp_score)
}

pub fn reconcile_risk_level(candidate: &Map<String, Value>) -> Option<RiskLevel> {
    let raw = candidate.get("risk_level")?.as_str()?.trim().to_lowercase();
    RiskLevel::from_str(&raw).ok().or_else(|| {
        RISK_LEVEL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == raw)
            .map(|(_, level)| *level)
    })
}

pub fn reconcile_decision(candidate: &Map<String, Value>) -> Option<Decision> {
    let raw = candidate
        .get("decision")?
        .as_str()?
        .trim()
        .to_uppercase()
        .replace([' ', '-'], "_");
    Decision::from_str(&raw).ok().or_else(|| {
        DECISION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == raw)
            .map(|(_, decision)| *decision)
    })
}

/// Passed through only when every value is a string.
pub fn reconcile_explanations(candidate: &Map<String, Value>) -> BTreeMap<String, String> {
    let Some(object) = candidate.get("explanations").and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    object
        .iter()
        .map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
        .collect::<Option<BTreeMap<_, _>>>()
        .unwrap_or_default()
}

/// `None` when the field is not an array. Non-string elements are stringified.
pub fn reconcile_flags(candidate: &Map<String, Value>, field: &str) -> Option<Vec<String>> {
    let items = candidate.get(field)?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

pub fn reconcile_recommendation(candidate: &Map<String, Value>) -> Option<String> {
    candidate
        .get("recommendation")?
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
