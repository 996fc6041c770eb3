//! Turns raw model text (or its absence) into a bounded [`RiskAssessment`].
//!
//! Two independent stages: [`extract`] recovers a candidate JSON object from
//! whatever text the model produced, [`reconcile`] coerces each field of that
//! candidate into its canonical form. Neither stage can fail; bad input only
//! degrades the result towards defaults and the heuristic score.

pub mod aliases;
pub mod extract;
pub mod reconcile;

use serde_json::{Map, Value};

use crate::{
    model::{Decision, RawAd, RiskAssessment, RiskLevel},
    scorers::{HeuristicScorer, Scorer},
};
use extract::{Extraction, extract_candidate};
use reconcile::*;

pub const DEFAULT_RECOMMENDATION: &str = "Analyse complétée.";

pub struct ResponseNormalizer<S: Scorer> {
    scorer: S,
}

impl Default for ResponseNormalizer<HeuristicScorer> {
    fn default() -> Self {
        Self::new(HeuristicScorer::default())
    }
}

impl<S: Scorer> ResponseNormalizer<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn normalize(&self, raw_model_output: Option<&str>, ad: &RawAd) -> RiskAssessment {
        let extraction = match raw_model_output {
            Some(text) => extract_candidate(text),
            None => Extraction::absent(),
        };
        tracing::debug!(
            source = ?extraction.source,
            recovered = extraction.recovered(),
            fields = extraction.candidate.len(),
            "Extracted candidate from model output"
        );
        self.reconcile(&extraction.candidate, ad)
    }

    /// Builds the assessment from an already extracted candidate object.
    ///
    /// Without a finite overall score, the weighted criteria (or, when no
    /// criterion was supplied either, the heuristic score) stand in for it, and
    /// an unusable risk level is derived from that score.
    pub fn reconcile(&self, candidate: &Map<String, Value>, ad: &RawAd) -> RiskAssessment {
        let (criteria, supplied) = reconcile_criteria(candidate);
        let explicit_score = reconcile_overall_score(candidate);
        let risk_level = reconcile_risk_level(candidate);
        let decision = reconcile_decision(candidate);
        let mut red_flags = reconcile_flags(candidate, "red_flags");
        let mut green_flags = reconcile_flags(candidate, "green_flags");

        let (overall_score, risk_level) = match explicit_score {
            Some(score) => (score, risk_level.unwrap_or(RiskLevel::Medium)),
            None if supplied > 0 => {
                let weighted = criteria.weighted_score();
                (weighted, risk_level.unwrap_or_else(|| RiskLevel::from_score(weighted)))
            }
            None => {
                let report = self.scorer.score(ad);
                tracing::debug!(score = report.score, "No model scores, using heuristic fallback");
                let level = risk_level.unwrap_or_else(|| report.risk_level());
                red_flags.get_or_insert(report.red_flags);
                green_flags.get_or_insert(report.green_flags);
                (report.score, level)
            }
        };

        RiskAssessment {
            overall_score,
            risk_level,
            decision: decision.unwrap_or_else(|| Decision::from(risk_level)),
            criteria,
            explanations: reconcile_explanations(candidate),
            red_flags: red_flags.unwrap_or_default(),
            green_flags: green_flags.unwrap_or_default(),
            recommendation: reconcile_recommendation(candidate)
                .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string()),
        }
    }
}

/// Normalizes with the built-in heuristic scorer as fallback.
pub fn normalize(raw_model_output: Option<&str>, ad: &RawAd) -> RiskAssessment {
    ResponseNormalizer::default().normalize(raw_model_output, ad)
}
