use common::{sample_ad_payload, test_helpers::sample_description};
use scoring::{
    HeuristicScorer, ResponseNormalizer, normalize,
    model::{Criteria, Decision, RawAd, RiskAssessment, RiskLevel},
    normalizer::DEFAULT_RECOMMENDATION,
};
use serde_json::json;

fn sample_ad() -> RawAd {
    serde_json::from_value(sample_ad_payload()).expect("fixture is a valid ad")
}

fn bare_ad() -> RawAd {
    RawAd {
        title: "Annonce".to_string(),
        ..RawAd::default()
    }
}

fn assert_invariants(assessment: &RiskAssessment) {
    assert!(assessment.overall_score <= 100);
    let criteria = serde_json::to_value(assessment.criteria).unwrap();
    let criteria = criteria.as_object().unwrap();
    assert_eq!(criteria.len(), 9);
    for (name, value) in criteria {
        let value = value.as_u64().unwrap_or_else(|| panic!("{} is not an integer", name));
        assert!(value <= 100, "{} out of range", name);
    }
    assert!(!assessment.recommendation.trim().is_empty());
}

#[test]
fn totality_over_hostile_inputs() {
    let inputs = [
        "",
        "   ",
        "Je ne peux pas analyser cette annonce.",
        "{\"overall_score\": 80, \"risk_level\": \"lo",
        "```json\n{ broken\n```",
        "```\n```",
        "Résultat: {\"overall_score\": \"9000\", \"criteria\": {\"rating\": -40}} fin",
        "{\"overall_score\": null, \"criteria\": [1,2,3], \"red_flags\": {\"a\": 1}}",
        "[\"not\", \"an\", \"object\"]",
        "null",
        "}{",
        "{\"criteria\": {\"seller_rating\": \"NaN\", \"items_count\": 1e400}}",
    ];

    for input in inputs {
        let assessment = normalize(Some(input), &bare_ad());
        assert_invariants(&assessment);
    }
    assert_invariants(&normalize(None, &bare_ad()));
}

#[test]
fn out_of_range_values_are_clamped() {
    let text = r#"{"overall_score": "250%", "criteria": {"seller_rating": -12, "photo_authenticity": 100.6}}"#;
    let assessment = normalize(Some(text), &bare_ad());

    assert_eq!(assessment.overall_score, 100);
    assert_eq!(assessment.criteria.seller_rating, 0);
    assert_eq!(assessment.criteria.photo_authenticity, 100);
}

#[test]
fn canonical_output_round_trips_unchanged() {
    let text = r#"{
        "overall_score": 67,
        "risk_level": "medium",
        "decision": "PRUDENCE",
        "criteria": {"seller_rating": 80, "account_age_months": 30, "positive_reviews": 70,
                     "writing_quality": 55, "photo_authenticity": 60, "price_fairness": 90,
                     "payment_safety": 45, "items_count": 20, "location_precision": 100},
        "explanations": {"price_fairness": "Prix cohérent avec le marché"},
        "red_flags": ["Compte récent"],
        "green_flags": ["Prix cohérent", "Photos correctes"],
        "recommendation": "Privilégiez la remise en main propre."
    }"#;
    let first = normalize(Some(text), &bare_ad());
    let serialized = serde_json::to_string(&first).unwrap();
    let second = normalize(Some(&serialized), &sample_ad());

    assert_eq!(first, second);
    assert_eq!(serde_json::to_string(&second).unwrap(), serialized);
}

#[test]
fn heuristic_fallback_output_also_round_trips() {
    let first = normalize(None, &sample_ad());
    let second = normalize(Some(&serde_json::to_string(&first).unwrap()), &bare_ad());
    assert_eq!(first, second);
}

#[test]
fn vendor_rating_resolves_to_seller_rating() {
    let assessment = normalize(Some(r#"{"criteria": {"vendor_rating": 87}}"#), &bare_ad());
    assert_eq!(assessment.criteria.seller_rating, 87);
}

#[test]
fn percentage_string_rating_resolves_to_seller_rating() {
    let assessment = normalize(Some(r#"{"criteria": {"rating": "72%"}}"#), &bare_ad());
    assert_eq!(assessment.criteria.seller_rating, 72);
}

#[test]
fn all_hundred_criteria_without_overall_score_give_hundred() {
    let text = json!({
        "criteria": {
            "seller_rating": 100, "account_age_months": 100, "positive_reviews": 100,
            "writing_quality": 100, "photo_authenticity": 100, "price_fairness": 100,
            "payment_safety": 100, "items_count": 100, "location_precision": 100
        }
    })
    .to_string();

    let assessment = normalize(Some(&text), &bare_ad());

    assert_eq!(assessment.overall_score, 100);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(assessment.decision, Decision::Go);
}

#[test]
fn weighted_score_drives_level_unless_model_gave_one() {
    let lone_zero = normalize(Some(r#"{"criteria": {"seller_rating": 0}}"#), &bare_ad());
    assert_eq!(lone_zero.overall_score, 0);
    assert_eq!(lone_zero.risk_level, RiskLevel::High);
    assert_eq!(lone_zero.decision, Decision::NoGo);

    let stated = normalize(
        Some(r#"{"criteria": {"seller_rating": 0}, "risk_level": "low"}"#),
        &bare_ad(),
    );
    assert_eq!(stated.overall_score, 0);
    assert_eq!(stated.risk_level, RiskLevel::Low);
    assert_eq!(stated.decision, Decision::Go);
}

#[test]
fn weighted_fallback_uses_axis_weights() {
    let text = r#"{"criteria": {"seller_rating": 100, "items_count": 50}}"#;
    let assessment = normalize(Some(text), &bare_ad());
    // 0.18 * 100 + 0.06 * 50
    assert_eq!(assessment.overall_score, 21);
}

#[test]
fn decision_is_derived_from_risk_level_when_missing_or_invalid() {
    let cases = [
        (r#"{"overall_score": 20, "risk_level": "high"}"#, Decision::NoGo),
        (r#"{"overall_score": 20, "risk_level": "high", "decision": "PEUT-ÊTRE"}"#, Decision::NoGo),
        (r#"{"overall_score": 90, "risk_level": "low", "decision": 1}"#, Decision::Go),
        (r#"{"overall_score": 60, "risk_level": "medium"}"#, Decision::Prudence),
    ];

    for (text, expected) in cases {
        assert_eq!(normalize(Some(text), &bare_ad()).decision, expected, "{}", text);
    }
}

#[test]
fn explicit_decision_is_kept_even_if_inconsistent_with_level() {
    let assessment = normalize(Some(r#"{"overall_score": 90, "risk_level": "low", "decision": "no_go"}"#), &bare_ad());
    assert_eq!(assessment.decision, Decision::NoGo);
}

#[test]
fn invalid_risk_level_defaults_to_medium_when_model_scored() {
    let assessment = normalize(Some(r#"{"overall_score": 10, "risk_level": "catastrophic"}"#), &bare_ad());
    assert_eq!(assessment.risk_level, RiskLevel::Medium);
    assert_eq!(assessment.decision, Decision::Prudence);
}

#[test]
fn json_fence_inside_prose_is_extracted() {
    let text = "Voici le résultat:\n```json\n{\"overall_score\": 42, \"risk_level\":\"low\"}\n```\nMerci";
    let assessment = normalize(Some(text), &bare_ad());

    assert_eq!(assessment.overall_score, 42);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(assessment.decision, Decision::Go);
}

#[test]
fn absent_output_uses_heuristic_score_and_defaults() {
    let ad = RawAd {
        description: Some(sample_description(200)),
        ..sample_ad()
    };
    let assessment = normalize(None, &ad);

    assert_eq!(assessment.criteria, Criteria::default());
    assert_eq!(assessment.overall_score, 75);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(assessment.decision, Decision::Go);
    assert_eq!(assessment.recommendation, DEFAULT_RECOMMENDATION);
    assert!(assessment.explanations.is_empty());
    assert!(assessment.red_flags.is_empty());
    assert_eq!(assessment.green_flags.len(), 4);
}

#[test]
fn unparseable_output_behaves_like_absent_output() {
    let ad = sample_ad();
    assert_eq!(normalize(Some("désolé, erreur"), &ad), normalize(None, &ad));
}

#[test]
fn model_flags_win_over_heuristic_flags_in_fallback() {
    let ad = RawAd {
        description: Some("Paiement par Western Union".to_string()),
        ..bare_ad()
    };
    let assessment = normalize(Some(r#"{"risk_level": "HIGH", "red_flags": ["Paiement suspect"]}"#), &ad);

    assert_eq!(assessment.overall_score, 20);
    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert_eq!(assessment.red_flags, vec!["Paiement suspect".to_string()]);
    assert!(assessment.green_flags.is_empty());
}

#[test]
fn risky_listing_without_model_is_high_risk() {
    let ad = RawAd {
        description: Some("Je suis à l'étranger, paiement par mandat cash ou bitcoin.".to_string()),
        ..bare_ad()
    };
    let assessment = normalize(None, &ad);

    assert_eq!(assessment.overall_score, 5);
    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert_eq!(assessment.decision, Decision::NoGo);
    assert!(assessment.red_flags.iter().any(|f| f.contains("mandat cash")));
}

#[test]
fn custom_scorer_drives_the_fallback() {
    let scorer = HeuristicScorer::with_terms(["livraison uniquement"], Vec::<&str>::new(), r"^$").unwrap();
    let normalizer = ResponseNormalizer::new(scorer);
    let ad = RawAd {
        description: Some("Livraison uniquement, pas de remise en main propre".to_string()),
        ..bare_ad()
    };

    assert_eq!(normalizer.normalize(None, &ad).overall_score, 20);
}
