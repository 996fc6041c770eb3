use std::fmt::Write;

use crate::model::{NumberOrText, RawAd};

const INSTRUCTIONS: &str = r#"Tu es un détecteur d'arnaques pour les petites annonces entre particuliers.
Analyse l'annonce ci-dessous et réponds UNIQUEMENT avec un objet JSON de la forme :
{
  "overall_score": nombre de 0 (arnaque certaine) à 100 (annonce sûre),
  "risk_level": "low|medium|high",
  "decision": "GO|PRUDENCE|NO_GO",
  "criteria": {
    "seller_rating": 0-100, "account_age_months": 0-100, "positive_reviews": 0-100,
    "writing_quality": 0-100, "photo_authenticity": 0-100, "price_fairness": 0-100,
    "payment_safety": 0-100, "items_count": 0-100, "location_precision": 0-100
  },
  "explanations": { "<critère>": "explication courte" },
  "red_flags": [ "..." ],
  "green_flags": [ "..." ],
  "recommendation": "..."
}"#;

/// Descriptions are cut to this many characters before being sent.
pub const MAX_DESCRIPTION_CHARS: usize = 4_000;

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "non renseigné".to_string())
}

fn field(value: &Option<NumberOrText>) -> String {
    or_unknown(value.as_ref().map(NumberOrText::to_string))
}

pub fn build_prompt(ad: &RawAd) -> String {
    let description: String = ad
        .description
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect();

    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\nAnnonce :\n");
    // Writing to a String cannot fail.
    let _ = writeln!(prompt, "Titre: {}", ad.title.trim());
    let _ = writeln!(prompt, "Prix: {}", field(&ad.price));
    let _ = writeln!(prompt, "Description: {}", or_unknown(Some(description)));
    let _ = writeln!(prompt, "Localisation: {}", or_unknown(ad.location.clone()));
    let _ = writeln!(prompt, "Photos: {}", ad.image_count());

    if let Some(seller) = &ad.seller {
        prompt.push_str("Vendeur:\n");
        let _ = writeln!(prompt, "  Note: {}", or_unknown(seller.rating.map(|r| r.to_string())));
        let seniority = seller.since_text.clone().or_else(|| seller.since_months.as_ref().map(|m| format!("{} mois", m)));
        let _ = writeln!(prompt, "  Ancienneté: {}", or_unknown(seniority));
        let _ = writeln!(prompt, "  Annonces en ligne: {}", field(&seller.items_count));
        let _ = writeln!(prompt, "  Avis: {} (positifs: {})", field(&seller.total_reviews), field(&seller.positive));
    }

    prompt
}
