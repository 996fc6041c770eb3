//! Accepted field names for model output.
//!
//! Earlier prompt versions asked for differently named fields, so each canonical
//! field lists the spellings still seen upstream, canonical name first. Lookup
//! takes the first spelling present with a non-null value.

use crate::model::{Criterion, Decision, RiskLevel};

/// Objects that may hold the nine criteria. When none is present the
/// candidate's top level is searched instead.
pub const CRITERIA_CONTAINERS: &[&str] = &["criteria", "criteres", "scores"];

pub const OVERALL_SCORE_ALIASES: &[&str] = &["overall_score", "global_score", "score"];

pub const CRITERION_ALIASES: [(Criterion, &[&str]); 9] = [
    (Criterion::SellerRating, &["seller_rating", "vendor_rating", "rating"]),
    (Criterion::AccountAgeMonths, &["account_age_months", "account_age", "seniority"]),
    (Criterion::PositiveReviews, &["positive_reviews", "reviews", "positive_feedback"]),
    (Criterion::WritingQuality, &["writing_quality", "description_quality", "text_quality"]),
    (Criterion::PhotoAuthenticity, &["photo_authenticity", "photo_quality", "photos"]),
    (Criterion::PriceFairness, &["price_fairness", "price_score", "price"]),
    (Criterion::PaymentSafety, &["payment_safety", "payment_security", "payment"]),
    (Criterion::ItemsCount, &["items_count", "listings_count", "items"]),
    (Criterion::LocationPrecision, &["location_precision", "location_score", "location"]),
];

/// Lower-cased level names besides the canonical `low|medium|high`.
pub const RISK_LEVEL_ALIASES: &[(&str, RiskLevel)] = &[
    ("faible", RiskLevel::Low),
    ("moyen", RiskLevel::Medium),
    ("moyenne", RiskLevel::Medium),
    ("modéré", RiskLevel::Medium),
    ("élevé", RiskLevel::High),
    ("eleve", RiskLevel::High),
];

/// Upper-cased decisions besides the canonical `GO|PRUDENCE|NO_GO`.
pub const DECISION_ALIASES: &[(&str, Decision)] = &[("NOGO", Decision::NoGo), ("CAUTION", Decision::Prudence)];

pub fn criterion_aliases(criterion: Criterion) -> &'static [&'static str] {
    CRITERION_ALIASES
        .iter()
        .find(|(c, _)| *c == criterion)
        .map(|(_, aliases)| *aliases)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_criterion_lists_its_canonical_name_first() {
        for criterion in Criterion::iter() {
            let aliases = criterion_aliases(criterion);
            assert!(aliases.len() >= 2, "{} needs synonyms", criterion);
            assert_eq!(aliases[0], criterion.as_ref());
        }
    }

    #[test]
    fn no_alias_is_claimed_by_two_criteria() {
        let mut seen = std::collections::HashSet::new();
        for (_, aliases) in CRITERION_ALIASES {
            for alias in aliases {
                assert!(seen.insert(*alias), "duplicate alias {}", alias);
            }
        }
    }
}
