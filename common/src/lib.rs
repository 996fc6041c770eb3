//! Configuration and test support shared by the listing guard crates.
//!
//! [`config`] holds the typed sections every executable reads and
//! [`yaml_include`] resolves the layered `!include` files they come from.
//! Fixtures and fallible assertions live in `test_helpers`, compiled only for
//! tests or with the `test-helpers` feature.

pub mod config;
pub mod yaml_include;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, sample_ad_payload};
