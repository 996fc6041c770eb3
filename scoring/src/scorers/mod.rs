pub mod heuristic;

pub use heuristic::*;

use crate::model::RawAd;

pub trait Scorer: Send + Sync {
    fn score(&self, ad: &RawAd) -> HeuristicReport;
}
