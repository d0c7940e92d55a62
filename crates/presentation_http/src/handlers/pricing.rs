//! Static pricing information

use axum::Json;
use serde::Serialize;

const PRICING_URL: &str =
    "https://azure.microsoft.com/en-us/pricing/details/cognitive-services/speech-services/";

/// One pricing card
#[derive(Debug, Serialize)]
pub struct PricingTier {
    pub service: &'static str,
    pub summary: &'static str,
    pub features: Vec<&'static str>,
    pub pricing_url: &'static str,
}

/// `GET /v1/pricing`
pub async fn pricing() -> Json<Vec<PricingTier>> {
    Json(vec![
        PricingTier {
            service: "Neural Text-to-Speech",
            summary: "High-quality neural voices with natural-sounding speech synthesis \
                      for various scenarios.",
            features: vec![
                "400+ neural voices",
                "140+ languages/locales",
                "SSML customization",
                "Prosody controls",
            ],
            pricing_url: PRICING_URL,
        },
        PricingTier {
            service: "Personal Voice",
            summary: "Create custom neural voices using your own voice samples for \
                      personalized text-to-speech experiences.",
            features: vec![
                "Custom voice creation",
                "Personal voice cloning",
                "Speaker profile management",
                "Consent verification",
            ],
            pricing_url: PRICING_URL,
        },
        PricingTier {
            service: "Custom Neural Voice",
            summary: "Professional-grade custom voice models trained on extensive audio \
                      datasets for brand-specific voices.",
            features: vec![
                "Enterprise voice training",
                "Multi-style voices",
                "Emotion & expressiveness",
                "Advanced customization",
            ],
            pricing_url: PRICING_URL,
        },
    ])
}
