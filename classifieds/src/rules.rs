use common::config::{ConfigError, HeuristicConfig};
use scoring::HeuristicScorer;

/// Payment channels typical of French-market scams, beyond the built-in list.
pub const MARKET_PAYMENT_TERMS: &[&str] = &[
    "coupon pcs",
    "paysafecard",
    "mandat compte",
    "virement international",
];

pub const MARKET_CRYPTO_MARKERS: &[&str] = &["litecoin", "tether"];

pub fn market_heuristic_config() -> HeuristicConfig {
    HeuristicConfig {
        extra_payment_terms: MARKET_PAYMENT_TERMS.iter().map(|t| t.to_string()).collect(),
        extra_crypto_markers: MARKET_CRYPTO_MARKERS.iter().map(|t| t.to_string()).collect(),
        unspecified_location_pattern: None,
    }
}

/// Market terms first, then whatever the deployment adds.
pub fn build_scorer(configured: &HeuristicConfig) -> Result<HeuristicScorer, ConfigError> {
    let mut config = market_heuristic_config();
    config
        .extra_payment_terms
        .extend(configured.extra_payment_terms.iter().cloned());
    config
        .extra_crypto_markers
        .extend(configured.extra_crypto_markers.iter().cloned());
    config.unspecified_location_pattern = configured.unspecified_location_pattern.clone();

    HeuristicScorer::from_config(&config)
}
