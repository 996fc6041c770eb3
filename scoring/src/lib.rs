pub mod analyzer;
pub mod error;
pub mod executable_utils;
pub mod llm;
pub mod model;
pub mod normalizer;
pub mod scorers;

pub use normalizer::{normalize, ResponseNormalizer};
pub use scorers::{HeuristicReport, HeuristicScorer, Scorer};
