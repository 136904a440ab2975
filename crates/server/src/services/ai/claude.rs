//! Generative business-idea parser using the Anthropic Messages API.
//!
//! Sends a fixed prompt asking for a JSON brand profile and validates the
//! model output before trusting it. Any deviation from the contract is an
//! error; resilience lives one layer up in
//! [`ResilientParser`](super::ResilientParser).

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use storeforge_core::{Cents, ProductKind};

use super::{BusinessIdea, IdeaParse, OFFER_COUNT, ParseIdeaError, ProductOffer};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for brand generation via Claude.
#[derive(Debug, Clone)]
pub struct ClaudeParser {
    client: reqwest::Client,
    model: String,
}

impl ClaudeParser {
    /// Create a new parser.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(api_key: &SecretString, model: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key.expose_secret()).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            model: model.into(),
        }
    }
}

impl IdeaParse for ClaudeParser {
    #[instrument(skip(self, idea), fields(idea_len = idea.len()))]
    async fn parse_idea(&self, idea: &str) -> Result<BusinessIdea, ParseIdeaError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: build_prompt(idea),
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ParseIdeaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let response: GenerateResponse = response.json().await?;

        let text = response
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text,
            })
            .next()
            .ok_or_else(|| ParseIdeaError::Parse("no text content in response".to_string()))?;

        interpret_response(idea, &text)
    }
}

/// Build the generation prompt for a business idea.
fn build_prompt(idea: &str) -> String {
    format!(
        "You are a branding expert helping creators launch their online stores.\n\n\
         Based on this business idea: \"{idea}\"\n\n\
         Generate a JSON response with:\n\
         1. brandName: A catchy, memorable brand name (2-3 words max)\n\
         2. tagline: A compelling tagline (under 60 characters)\n\
         3. description: A short description for the store (2-3 sentences)\n\
         4. productSuggestions: An array of exactly 2 products to sell\n\n\
         For each product include:\n\
         - name: Product name\n\
         - description: Brief description (1-2 sentences)\n\
         - price: Price in cents (reasonable for the product type)\n\
         - type: Either \"DIGITAL\" or \"SERVICE\"\n\n\
         Rules:\n\
         - Make the brand name unique and professional\n\
         - Keep prices realistic ($29-$149 range typically)\n\
         - Mix product types if possible (one digital, one service)\n\
         - Be creative but practical\n\n\
         Return ONLY valid JSON, no markdown or explanation."
    )
}

/// Decode and validate model output into a [`BusinessIdea`].
///
/// Tolerates a markdown code fence around the JSON; everything else must
/// match the contract exactly.
fn interpret_response(idea: &str, text: &str) -> Result<BusinessIdea, ParseIdeaError> {
    let json = strip_code_fence(text);

    let generated: GeneratedIdea =
        serde_json::from_str(json).map_err(|e| ParseIdeaError::Parse(e.to_string()))?;

    if generated.brand_name.trim().is_empty() {
        return Err(ParseIdeaError::Invalid("empty brand name".to_string()));
    }
    if generated.product_suggestions.len() != OFFER_COUNT {
        return Err(ParseIdeaError::Invalid(format!(
            "expected {OFFER_COUNT} product suggestions, got {}",
            generated.product_suggestions.len()
        )));
    }

    let mut offers = Vec::with_capacity(OFFER_COUNT);
    for suggestion in generated.product_suggestions {
        let price = Cents::new(suggestion.price);
        if !price.is_positive() {
            return Err(ParseIdeaError::Invalid(format!(
                "non-positive price {price} for {:?}",
                suggestion.name
            )));
        }
        if suggestion.name.trim().is_empty() {
            return Err(ParseIdeaError::Invalid("empty product name".to_string()));
        }
        offers.push(ProductOffer {
            name: suggestion.name,
            description: suggestion.description,
            price,
            kind: suggestion.kind,
        });
    }

    Ok(BusinessIdea {
        raw: idea.trim().to_string(),
        brand_name: generated.brand_name,
        tagline: generated.tagline,
        description: generated.description,
        offers,
    })
}

/// Strip a surrounding ```json ... ``` (or plain ```) fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Request body for brand generation.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

/// A message in the request.
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Response from the Messages API.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: Vec<ContentBlock>,
}

/// Content block in the response.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

/// The JSON shape the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedIdea {
    brand_name: String,
    tagline: String,
    description: String,
    product_suggestions: Vec<GeneratedOffer>,
}

#[derive(Debug, Deserialize)]
struct GeneratedOffer {
    name: String,
    description: String,
    price: i64,
    #[serde(rename = "type")]
    kind: ProductKind,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "brandName": "Zen Flow",
        "tagline": "Move with intention",
        "description": "Yoga for busy people.",
        "productSuggestions": [
            {"name": "Video Library", "description": "On-demand classes", "price": 2900, "type": "DIGITAL"},
            {"name": "Private Session", "description": "One hour, one-on-one", "price": 9900, "type": "SERVICE"}
        ]
    }"#;

    #[test]
    fn test_interpret_valid_response() {
        let idea = interpret_response("yoga classes", VALID_JSON).unwrap();

        assert_eq!(idea.brand_name, "Zen Flow");
        assert_eq!(idea.tagline, "Move with intention");
        assert_eq!(idea.raw, "yoga classes");
        assert_eq!(idea.offers.len(), 2);
        assert_eq!(idea.offers[0].kind, ProductKind::Digital);
        assert_eq!(idea.offers[1].price, Cents::new(9900));
    }

    #[test]
    fn test_interpret_tolerates_code_fence() {
        let fenced = format!("```json\n{VALID_JSON}\n```");
        let idea = interpret_response("yoga classes", &fenced).unwrap();
        assert_eq!(idea.brand_name, "Zen Flow");

        let bare_fence = format!("```\n{VALID_JSON}\n```");
        assert!(interpret_response("yoga classes", &bare_fence).is_ok());
    }

    #[test]
    fn test_interpret_rejects_prose() {
        let err = interpret_response("x", "Here is your store idea!").unwrap_err();
        assert!(matches!(err, ParseIdeaError::Parse(_)));
    }

    #[test]
    fn test_interpret_rejects_wrong_offer_count() {
        let one_offer = r#"{
            "brandName": "Zen Flow",
            "tagline": "t",
            "description": "d",
            "productSuggestions": [
                {"name": "Only One", "description": "d", "price": 2900, "type": "DIGITAL"}
            ]
        }"#;
        let err = interpret_response("x", one_offer).unwrap_err();
        assert!(matches!(err, ParseIdeaError::Invalid(_)));
    }

    #[test]
    fn test_interpret_rejects_non_positive_price() {
        let free_offer = r#"{
            "brandName": "Zen Flow",
            "tagline": "t",
            "description": "d",
            "productSuggestions": [
                {"name": "Freebie", "description": "d", "price": 0, "type": "DIGITAL"},
                {"name": "Session", "description": "d", "price": 9900, "type": "SERVICE"}
            ]
        }"#;
        let err = interpret_response("x", free_offer).unwrap_err();
        assert!(matches!(err, ParseIdeaError::Invalid(_)));
    }

    #[test]
    fn test_interpret_rejects_unknown_kind() {
        let bad_kind = r#"{
            "brandName": "Zen Flow",
            "tagline": "t",
            "description": "d",
            "productSuggestions": [
                {"name": "A", "description": "d", "price": 2900, "type": "PHYSICAL"},
                {"name": "B", "description": "d", "price": 9900, "type": "SERVICE"}
            ]
        }"#;
        let err = interpret_response("x", bad_kind).unwrap_err();
        assert!(matches!(err, ParseIdeaError::Parse(_)));
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }
}
