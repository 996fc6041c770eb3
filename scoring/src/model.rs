use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::AnalysisError;

/// Listing fields as scraped by the extension. Untrusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAd {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub price: Option<NumberOrText>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub seller: Option<Seller>,
}

impl RawAd {
    /// Only the title is mandatory; the request layer calls this before scoring.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.title.trim().is_empty() {
            return Err(AnalysisError::MissingAd);
        }
        Ok(())
    }

    pub fn has_price(&self) -> bool {
        match &self.price {
            Some(NumberOrText::Number(_)) => true,
            Some(NumberOrText::Text(text)) => !text.trim().is_empty(),
            None => false,
        }
    }

    /// Counts image descriptors that are neither null nor blank strings.
    pub fn image_count(&self) -> usize {
        self.images
            .iter()
            .flatten()
            .filter(|image| match image {
                serde_json::Value::Null => false,
                serde_json::Value::String(s) => !s.trim().is_empty(),
                _ => true,
            })
            .count()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scraped values arrive either as JSON numbers or as display text ("450 €").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub since_months: Option<NumberOrText>,
    #[serde(default)]
    pub since_text: Option<String>,
    #[serde(default)]
    pub items_count: Option<NumberOrText>,
    #[serde(default)]
    pub total_reviews: Option<NumberOrText>,
    #[serde(default)]
    pub positive: Option<NumberOrText>,
}

/// The nine scoring axes, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Criterion {
    SellerRating,
    AccountAgeMonths,
    PositiveReviews,
    WritingQuality,
    PhotoAuthenticity,
    PriceFairness,
    PaymentSafety,
    ItemsCount,
    LocationPrecision,
}

impl Criterion {
    /// Contribution to the fallback overall score. Weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Criterion::SellerRating => 0.18,
            Criterion::AccountAgeMonths => 0.12,
            Criterion::PositiveReviews => 0.10,
            Criterion::WritingQuality => 0.12,
            Criterion::PhotoAuthenticity => 0.11,
            Criterion::PriceFairness => 0.12,
            Criterion::PaymentSafety => 0.12,
            Criterion::ItemsCount => 0.06,
            Criterion::LocationPrecision => 0.07,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub seller_rating: u8,
    pub account_age_months: u8,
    pub positive_reviews: u8,
    pub writing_quality: u8,
    pub photo_authenticity: u8,
    pub price_fairness: u8,
    pub payment_safety: u8,
    pub items_count: u8,
    pub location_precision: u8,
}

impl Criteria {
    pub fn get(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::SellerRating => self.seller_rating,
            Criterion::AccountAgeMonths => self.account_age_months,
            Criterion::PositiveReviews => self.positive_reviews,
            Criterion::WritingQuality => self.writing_quality,
            Criterion::PhotoAuthenticity => self.photo_authenticity,
            Criterion::PriceFairness => self.price_fairness,
            Criterion::PaymentSafety => self.payment_safety,
            Criterion::ItemsCount => self.items_count,
            Criterion::LocationPrecision => self.location_precision,
        }
    }

    pub fn set(&mut self, criterion: Criterion, value: u8) {
        let slot = match criterion {
            Criterion::SellerRating => &mut self.seller_rating,
            Criterion::AccountAgeMonths => &mut self.account_age_months,
            Criterion::PositiveReviews => &mut self.positive_reviews,
            Criterion::WritingQuality => &mut self.writing_quality,
            Criterion::PhotoAuthenticity => &mut self.photo_authenticity,
            Criterion::PriceFairness => &mut self.price_fairness,
            Criterion::PaymentSafety => &mut self.payment_safety,
            Criterion::ItemsCount => &mut self.items_count,
            Criterion::LocationPrecision => &mut self.location_precision,
        };
        *slot = value.min(100);
    }

    /// Weighted sum of all axes, rounded and clamped to [0,100].
    pub fn weighted_score(&self) -> u8 {
        use strum::IntoEnumIterator;

        let total: f64 = Criterion::iter()
            .map(|criterion| criterion.weight() * f64::from(self.get(criterion)))
            .sum();
        total.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Maps a 0-100 trust score (higher is safer) onto a level.
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => RiskLevel::Low,
            50..=74 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Go,
    Prudence,
    NoGo,
}

impl From<RiskLevel> for Decision {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Decision::Go,
            RiskLevel::Medium => Decision::Prudence,
            RiskLevel::High => Decision::NoGo,
        }
    }
}

/// Canonical, bounded result returned to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    pub decision: Decision,
    pub criteria: Criteria,
    pub explanations: BTreeMap<String, String>,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    pub recommendation: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub data: Option<RawAd>,
}

impl AnalyzeRequest {
    /// Extracts the listing, rejecting requests without a usable title.
    pub fn into_ad(self) -> Result<RawAd, AnalysisError> {
        let ad = self.data.ok_or(AnalysisError::MissingAd)?;
        ad.validate()?;
        Ok(ad)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(data: RiskAssessment) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
