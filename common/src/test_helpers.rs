//! Fixtures and fallible assertions shared by the `scoring` and `classifieds`
//! test suites.

/// Low-risk listing as the extension posts it under `data`. The 200-character
/// description names no risky payment channel.
pub fn sample_ad_payload() -> serde_json::Value {
    serde_json::json!({
        "title": "Vélo de route Décathlon Triban RC520 taille M",
        "price": "450 €",
        "description": sample_description(200),
        "location": "Lyon 69003",
        "images": ["https://img.example.test/ad/1.jpg", "https://img.example.test/ad/2.jpg"],
        "seller": {
            "rating": 4.8,
            "sinceMonths": 38,
            "sinceText": "Membre depuis 3 ans",
            "itemsCount": 12,
            "totalReviews": 41,
            "positive": 40
        }
    })
}

/// Neutral description of exactly `len` characters.
pub fn sample_description(len: usize) -> String {
    let sentence = "Vélo en très bon état, entretenu régulièrement, remise en main propre possible. ";
    sentence.chars().cycle().take(len).collect()
}

/// Lets tests use `?` on fixtures, requests and JSON instead of unwrapping.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("check failed: {0}")]
    Assertion(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http: {0}")]
    Http(#[from] http::Error),
    #[error("{0}")]
    Other(String),
}

impl TestError {
    pub fn assertion_failure(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

pub type TestResult<T = ()> = Result<T, TestError>;

/// `assert!` that returns `TestError::Assertion` from the enclosing test.
#[macro_export]
macro_rules! test_assert {
    ($condition:expr $(,)?) => {
        $crate::test_assert!($condition, "{}", stringify!($condition))
    };
    ($condition:expr, $($fmt:tt)+) => {
        if !$condition {
            return Err($crate::test_helpers::TestError::assertion_failure(format!($($fmt)+)));
        }
    };
}

/// `assert_eq!` that returns `TestError::Assertion` from the enclosing test.
#[macro_export]
macro_rules! test_assert_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (left, right) = (&$left, &$right);
        if *left != *right {
            return Err($crate::test_helpers::TestError::assertion_failure(format!(
                "{} != {}: {:?} vs {:?}",
                stringify!($left),
                stringify!($right),
                left,
                right
            )));
        }
    }};
}

pub mod test_utils {
    use super::{TestError, TestResult};

    /// Request with a string body; a JSON content type is set when a body is given.
    pub fn build_request(method: &str, uri: &str, body: Option<String>) -> TestResult<http::Request<String>> {
        let builder = http::Request::builder().method(method).uri(uri);
        let builder = match body {
            Some(_) => builder.header(http::header::CONTENT_TYPE, "application/json"),
            None => builder,
        };
        Ok(builder.body(body.unwrap_or_default())?)
    }

    pub fn parse_json(body: &str) -> TestResult<serde_json::Value> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn check_status_code(actual: http::StatusCode, expected: http::StatusCode) -> TestResult {
        if actual == expected {
            return Ok(());
        }
        Err(TestError::assertion_failure(format!("expected {}, got {}", expected, actual)))
    }
}
