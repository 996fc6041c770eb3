use common::config::{ConfigError, HeuristicConfig};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    model::{RawAd, RiskLevel},
    scorers::Scorer,
};

pub const BASE_SCORE: i32 = 50;
pub const MIN_SCORE: i32 = 5;
pub const MAX_SCORE: i32 = 95;
/// Descriptions strictly longer than this many characters earn the detail bonus.
pub const DETAILED_DESCRIPTION_CHARS: usize = 120;

pub const DEFAULT_PAYMENT_TERMS: &[&str] = &[
    "western union",
    "moneygram",
    "mandat cash",
    "transcash",
    "pcs mastercard",
    "neosurf",
];

pub const DEFAULT_CRYPTO_MARKERS: &[&str] = &["bitcoin", "btc", "crypto", "usdt", "ethereum", "binance"];

pub const DEFAULT_UNSPECIFIED_LOCATION_PATTERN: &str = r"(?i)^\s*(?:non\s+(?:sp[ée]cifi[ée]e?|renseign[ée]e?|pr[ée]cis[ée]e?)|not\s+specified|unknown|inconnue?|n/?a|-+)?\s*$";

static DEFAULT_PAYMENT_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    term_regex(DEFAULT_PAYMENT_TERMS.iter().copied()).expect("built-in payment terms compile")
});
static DEFAULT_CRYPTO_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    term_regex(DEFAULT_CRYPTO_MARKERS.iter().copied()).expect("built-in crypto markers compile")
});
static DEFAULT_UNSPECIFIED_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_UNSPECIFIED_LOCATION_PATTERN).expect("built-in location pattern compiles")
});

/// Outcome of the keyword and structure rules for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicReport {
    /// Trust score in [5,95]; higher is safer.
    pub score: u8,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
}

impl HeuristicReport {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }
}

/// Keyword and structure based scorer used when no model judgment is available.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    payment_terms: Option<Regex>,
    crypto_markers: Option<Regex>,
    unspecified_location: Regex,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            payment_terms: DEFAULT_PAYMENT_RE.clone(),
            crypto_markers: DEFAULT_CRYPTO_RE.clone(),
            unspecified_location: DEFAULT_UNSPECIFIED_LOCATION_RE.clone(),
        }
    }
}

impl HeuristicScorer {
    /// Built-in term lists extended with the configured extras.
    pub fn from_config(config: &HeuristicConfig) -> Result<Self, ConfigError> {
        Self::with_terms(
            DEFAULT_PAYMENT_TERMS
                .iter()
                .copied()
                .chain(config.extra_payment_terms.iter().map(String::as_str)),
            DEFAULT_CRYPTO_MARKERS
                .iter()
                .copied()
                .chain(config.extra_crypto_markers.iter().map(String::as_str)),
            config
                .unspecified_location_pattern
                .as_deref()
                .unwrap_or(DEFAULT_UNSPECIFIED_LOCATION_PATTERN),
        )
    }

    pub fn with_terms<'a>(
        payment_terms: impl IntoIterator<Item = &'a str>,
        crypto_markers: impl IntoIterator<Item = &'a str>,
        unspecified_location_pattern: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |what: &str, e: regex::Error| ConfigError::Invalid(format!("heuristic {}: {}", what, e));

        let scorer = Self {
            payment_terms: term_regex(payment_terms).map_err(|e| invalid("payment terms", e))?,
            crypto_markers: term_regex(crypto_markers).map_err(|e| invalid("crypto markers", e))?,
            unspecified_location: Regex::new(unspecified_location_pattern)
                .map_err(|e| invalid("unspecified_location_pattern", e))?,
        };
        tracing::debug!(?scorer, "Heuristic scorer configured");
        Ok(scorer)
    }

    fn location_is_specified(&self, location: Option<&str>) -> bool {
        location.is_some_and(|loc| !self.unspecified_location.is_match(loc))
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, ad: &RawAd) -> HeuristicReport {
        let mut score = BASE_SCORE;
        let mut red_flags = Vec::new();
        let mut green_flags = Vec::new();

        if ad.has_price() {
            score += 5;
            green_flags.push("Prix indiqué".to_string());
        }

        let description = ad.description.as_deref().unwrap_or_default();
        if description.chars().count() > DETAILED_DESCRIPTION_CHARS {
            score += 10;
            green_flags.push("Description détaillée".to_string());
        }

        if let Some(term) = first_match(&self.payment_terms, description) {
            score -= 30;
            red_flags.push(format!("Moyen de paiement à risque mentionné : {}", term));
        }

        if let Some(marker) = first_match(&self.crypto_markers, description) {
            score -= 20;
            red_flags.push(format!("Paiement en cryptomonnaie évoqué : {}", marker));
        }

        if self.location_is_specified(ad.location.as_deref()) {
            score += 5;
            green_flags.push("Localisation renseignée".to_string());
        } else {
            red_flags.push("Localisation non précisée".to_string());
        }

        if ad.image_count() > 0 {
            score += 5;
            green_flags.push("Photos présentes".to_string());
        } else {
            red_flags.push("Aucune photo".to_string());
        }

        let score = score.clamp(MIN_SCORE, MAX_SCORE) as u8;
        tracing::trace!(score, red = red_flags.len(), green = green_flags.len(), "Heuristic score computed");

        HeuristicReport {
            score,
            red_flags,
            green_flags,
        }
    }
}

fn first_match<'t>(regex: &Option<Regex>, text: &'t str) -> Option<&'t str> {
    regex.as_ref()?.find(text).map(|m| m.as_str())
}

/// Case-insensitive alternation of the given terms, matched anywhere in the
/// text ("bitcoins" contains "bitcoin"). Whitespace inside a term matches any
/// run of whitespace. `None` when no terms remain.
fn term_regex<'a>(terms: impl IntoIterator<Item = &'a str>) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = terms
        .into_iter()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            term.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    Regex::new(&format!(r"(?i)(?:{})", alternatives.join("|"))).map(Some)
}
