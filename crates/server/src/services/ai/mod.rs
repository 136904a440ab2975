//! Business-idea parsing: free text in, brand profile and starter catalog out.
//!
//! Two interchangeable strategies sit behind the [`IdeaParse`] trait:
//!
//! - [`FallbackParser`] - deterministic, total, zero dependencies. Always
//!   available, always succeeds.
//! - [`ClaudeParser`] - a single call to the Anthropic Messages API with a
//!   fixed prompt contract. Treated as untrusted: its output is validated
//!   before use and any failure (transport, malformed JSON, bad shape) is
//!   an error.
//!
//! [`ResilientParser`] composes the two: it tries the generative strategy
//! and degrades to the fallback on any error, so callers never observe a
//! generation failure. [`IdeaParser`] is the configuration-selected top
//! level held in application state.

pub mod claude;
pub mod fallback;

use serde::Serialize;
use thiserror::Error;

use storeforge_core::{Cents, ProductKind};

pub use claude::ClaudeParser;
pub use fallback::FallbackParser;

/// Number of starter offers every parse produces.
pub const OFFER_COUNT: usize = 2;

/// A catalog item candidate produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOffer {
    pub name: String,
    pub description: String,
    pub price: Cents,
    pub kind: ProductKind,
}

/// A parsed business idea: brand identity plus exactly two starter offers.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessIdea {
    /// The trimmed input text.
    pub raw: String,
    pub brand_name: String,
    pub tagline: String,
    pub description: String,
    /// Always exactly [`OFFER_COUNT`] entries, each with a positive price.
    pub offers: Vec<ProductOffer>,
}

/// Errors from the generative parsing strategy.
///
/// These never escape [`ResilientParser`]; they exist so the degradation
/// path can log what went wrong.
#[derive(Debug, Error)]
pub enum ParseIdeaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response parsed but violated the output contract.
    #[error("invalid generated idea: {0}")]
    Invalid(String),
}

/// A parsing strategy.
pub trait IdeaParse {
    /// Parse a trimmed, non-empty business idea.
    fn parse_idea(
        &self,
        idea: &str,
    ) -> impl Future<Output = Result<BusinessIdea, ParseIdeaError>> + Send;
}

/// Decorator that falls back to the deterministic parser when the primary
/// strategy fails.
#[derive(Debug, Clone)]
pub struct ResilientParser<P> {
    primary: P,
    fallback: FallbackParser,
}

impl<P: IdeaParse> ResilientParser<P> {
    /// Wrap a primary strategy with deterministic degradation.
    #[must_use]
    pub const fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: FallbackParser,
        }
    }

    /// Parse an idea, never failing: any primary-strategy error is logged
    /// and the deterministic fallback result is returned instead.
    pub async fn parse_idea(&self, idea: &str) -> BusinessIdea {
        match self.primary.parse_idea(idea).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "generative parse failed, using fallback");
                self.fallback.parse(idea)
            }
        }
    }
}

/// The configuration-selected parsing strategy held in application state.
#[derive(Debug, Clone)]
pub enum IdeaParser {
    /// Deterministic only (no API key configured).
    Deterministic(FallbackParser),
    /// Generative with silent degradation.
    Generative(ResilientParser<ClaudeParser>),
}

impl IdeaParser {
    /// Parse a business idea with the configured strategy. Total: never fails.
    pub async fn parse(&self, idea: &str) -> BusinessIdea {
        match self {
            Self::Deterministic(parser) => parser.parse(idea),
            Self::Generative(parser) => parser.parse_idea(idea).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A primary strategy that always fails, for exercising the decorator.
    struct AlwaysFails;

    impl IdeaParse for AlwaysFails {
        async fn parse_idea(&self, _idea: &str) -> Result<BusinessIdea, ParseIdeaError> {
            Err(ParseIdeaError::Parse("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_resilient_parser_degrades_to_fallback() {
        let parser = ResilientParser::new(AlwaysFails);
        let idea = parser.parse_idea("I teach yoga and want to sell video courses").await;

        // The fallback output, not an error
        assert_eq!(idea.brand_name, "I Teach Yoga");
        assert_eq!(idea.offers.len(), OFFER_COUNT);
    }
}
