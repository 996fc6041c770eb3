use crate::{
    llm::{ModelClient, build_prompt},
    model::{RawAd, RiskAssessment},
    normalizer::ResponseNormalizer,
    scorers::Scorer,
};
use metrics::{counter, histogram};
#[cfg(not(test))]
use tracing::{debug, info, warn};
#[cfg(test)]
use {println as debug, println as info, println as warn};
use std::{sync::Arc, time::Instant};

/// One analysis per request: at most one model call, then normalization.
pub struct Analyzer<S: Scorer> {
    client: Option<Arc<dyn ModelClient>>,
    normalizer: ResponseNormalizer<S>,
}

impl<S: Scorer> Analyzer<S> {
    pub fn new(client: Option<Arc<dyn ModelClient>>, normalizer: ResponseNormalizer<S>) -> Self {
        match client {
            Some(_) => info!("Initializing Analyzer with model client"),
            None => info!("Initializing Analyzer in heuristic-only mode"),
        }
        Self { client, normalizer }
    }

    pub fn heuristic_only(normalizer: ResponseNormalizer<S>) -> Self {
        Self::new(None, normalizer)
    }

    pub fn has_model(&self) -> bool {
        self.client.is_some()
    }

    /// Never fails; model errors degrade to the heuristic path.
    pub async fn analyze(&self, ad: &RawAd) -> RiskAssessment {
        let model_output = self.fetch_model_output(ad).await;
        let source = if model_output.is_some() { "model" } else { "heuristic" };
        counter!("guard_analyses_total", "source" => source).increment(1);

        let assessment = self.normalizer.normalize(model_output.as_deref(), ad);
        debug!(
            "Analyzed '{}' from {} output: score {} ({})",
            ad.title, source, assessment.overall_score, assessment.risk_level
        );
        assessment
    }

    async fn fetch_model_output(&self, ad: &RawAd) -> Option<String> {
        let client = self.client.as_ref()?;
        let prompt = build_prompt(ad);

        let started = Instant::now();
        let result = client.complete(&prompt).await;
        histogram!("guard_model_call_seconds").record(started.elapsed().as_secs_f64());

        match result {
            Ok(text) => {
                debug!("Model answered with {} bytes", text.len());
                Some(text)
            }
            Err(e) => {
                counter!("guard_model_errors_total").increment(1);
                warn!("Model call failed, falling back to heuristic analysis: {}", e);
                None
            }
        }
    }
}
