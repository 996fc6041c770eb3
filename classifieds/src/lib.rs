//! Listing risk analysis for French classified-ad marketplaces.
//!
//! The generic engine lives in `scoring`; this crate supplies the
//! market-specific heuristic vocabulary and the executables.

pub mod rules;

use scoring::{HeuristicScorer, ResponseNormalizer, analyzer::Analyzer, llm::ModelClient};
use std::sync::Arc;

use common::config::{Config, ConfigError};

/// Wires the normalizer and, when a provider key is configured, the model client.
pub fn build_analyzer(config: &Config) -> Result<Analyzer<HeuristicScorer>, Box<dyn std::error::Error + Send + Sync>> {
    let scorer = rules::build_scorer(&config.heuristic)?;
    let normalizer = ResponseNormalizer::new(scorer);

    let client: Option<Arc<dyn ModelClient>> = match config.llm.api_key() {
        Some(api_key) => {
            let client: Arc<dyn ModelClient> =
                Arc::new(scoring::llm::AnthropicClient::new(&config.llm, api_key)?);
            Some(client)
        }
        None => {
            tracing::warn!(
                env = %config.llm.api_key_env,
                "No model API key set, running heuristic analysis only"
            );
            None
        }
    };

    Ok(Analyzer::new(client, normalizer))
}

/// Normalizer with the market rules, for offline runs without a model client.
pub fn build_normalizer(config: &Config) -> Result<ResponseNormalizer<HeuristicScorer>, ConfigError> {
    Ok(ResponseNormalizer::new(rules::build_scorer(&config.heuristic)?))
}
