//! Deterministic business-idea parser.
//!
//! Total over every input: same idea in, same brand and catalog out, no I/O.
//! Used directly when no API key is configured, and as the degradation
//! target of [`ResilientParser`](super::ResilientParser).

use std::sync::LazyLock;

use regex::Regex;

use storeforge_core::{Cents, ProductKind};

use super::{BusinessIdea, IdeaParse, ParseIdeaError, ProductOffer};

static DIGITAL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"(?i)ebook|course|template|guide|download|pdf").unwrap()
});

static SERVICE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"(?i)coaching|consulting|service|session|call|mentoring").unwrap()
});

/// Template-driven parser: brand from the leading words, catalog from
/// keyword classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser;

impl FallbackParser {
    /// Parse an idea deterministically.
    #[must_use]
    pub fn parse(&self, idea: &str) -> BusinessIdea {
        let cleaned = idea.trim();
        let brand_name = brand_from(cleaned);

        let tagline = format!("{brand_name} - Your trusted partner");
        let description =
            format!("Welcome to {brand_name}! {cleaned}. We're here to help you succeed.");

        let has_digital = DIGITAL_KEYWORDS.is_match(cleaned);
        let has_service = SERVICE_KEYWORDS.is_match(cleaned);

        let mut offers = Vec::with_capacity(super::OFFER_COUNT);

        if has_digital || !has_service {
            offers.push(ProductOffer {
                name: format!("{brand_name} Starter Guide"),
                description: format!("Complete guide to get started with {brand_name}"),
                price: Cents::new(2900),
                kind: ProductKind::Digital,
            });
        }

        if has_service || offers.is_empty() {
            offers.push(ProductOffer {
                name: "1-on-1 Consultation".to_string(),
                description: "Personal consultation session to help you achieve your goals"
                    .to_string(),
                price: Cents::new(9900),
                kind: ProductKind::Service,
            });
        }

        // Pad a single-offer catalog with its complement
        if let [only] = offers.as_slice() {
            let companion = match only.kind {
                ProductKind::Digital => ProductOffer {
                    name: format!("{brand_name} Workshop"),
                    description: "Interactive workshop to dive deeper".to_string(),
                    price: Cents::new(14900),
                    kind: ProductKind::Service,
                },
                ProductKind::Service => ProductOffer {
                    name: format!("{brand_name} Toolkit"),
                    description: "Essential templates and resources".to_string(),
                    price: Cents::new(4900),
                    kind: ProductKind::Digital,
                },
            };
            offers.push(companion);
        }

        offers.truncate(super::OFFER_COUNT);

        BusinessIdea {
            raw: cleaned.to_string(),
            brand_name,
            tagline,
            description,
            offers,
        }
    }
}

impl IdeaParse for FallbackParser {
    async fn parse_idea(&self, idea: &str) -> Result<BusinessIdea, ParseIdeaError> {
        Ok(self.parse(idea))
    }
}

/// First three whitespace-separated words, each title-cased.
fn brand_from(cleaned: &str) -> String {
    cleaned
        .split_whitespace()
        .take(3)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yoga_idea() {
        let idea = FallbackParser.parse("I teach yoga and sell online courses");

        assert_eq!(idea.brand_name, "I Teach Yoga");
        assert_eq!(idea.tagline, "I Teach Yoga - Your trusted partner");
        assert_eq!(
            idea.description,
            "Welcome to I Teach Yoga! I teach yoga and sell online courses. \
             We're here to help you succeed."
        );
        assert_eq!(idea.raw, "I teach yoga and sell online courses");
    }

    #[test]
    fn test_digital_keyword_yields_starter_guide_and_workshop() {
        let idea = FallbackParser.parse("selling an ebook about gardening");

        assert_eq!(idea.offers.len(), 2);
        assert_eq!(idea.offers[0].name, "Selling An Ebook Starter Guide");
        assert_eq!(idea.offers[0].kind, ProductKind::Digital);
        assert_eq!(idea.offers[0].price, Cents::new(2900));
        assert_eq!(idea.offers[1].name, "Selling An Ebook Workshop");
        assert_eq!(idea.offers[1].kind, ProductKind::Service);
        assert_eq!(idea.offers[1].price, Cents::new(14900));
    }

    #[test]
    fn test_service_keyword_yields_consultation_and_toolkit() {
        let idea = FallbackParser.parse("career coaching for engineers");

        assert_eq!(idea.offers.len(), 2);
        assert_eq!(idea.offers[0].name, "1-on-1 Consultation");
        assert_eq!(idea.offers[0].kind, ProductKind::Service);
        assert_eq!(idea.offers[0].price, Cents::new(9900));
        assert_eq!(idea.offers[1].name, "Career Coaching For Toolkit");
        assert_eq!(idea.offers[1].kind, ProductKind::Digital);
        assert_eq!(idea.offers[1].price, Cents::new(4900));
    }

    #[test]
    fn test_both_keywords_yield_guide_and_consultation() {
        let idea = FallbackParser.parse("a course plus coaching sessions");

        assert_eq!(idea.offers.len(), 2);
        assert_eq!(idea.offers[0].kind, ProductKind::Digital);
        assert_eq!(idea.offers[0].price, Cents::new(2900));
        assert_eq!(idea.offers[1].name, "1-on-1 Consultation");
        assert_eq!(idea.offers[1].kind, ProductKind::Service);
    }

    #[test]
    fn test_no_keywords_default_to_guide_and_workshop() {
        let idea = FallbackParser.parse("handmade pottery");

        assert_eq!(idea.offers.len(), 2);
        assert_eq!(idea.offers[0].name, "Handmade Pottery Starter Guide");
        assert_eq!(idea.offers[1].name, "Handmade Pottery Workshop");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let idea = FallbackParser.parse("My EBOOK empire");
        assert_eq!(idea.offers[0].kind, ProductKind::Digital);

        let idea = FallbackParser.parse("COACHING for founders");
        assert_eq!(idea.offers[0].kind, ProductKind::Service);
    }

    #[test]
    fn test_brand_name_caps_at_three_words() {
        let idea = FallbackParser.parse("one two three four five");
        assert_eq!(idea.brand_name, "One Two Three");
    }

    #[test]
    fn test_brand_name_shorter_ideas() {
        assert_eq!(FallbackParser.parse("pottery").brand_name, "Pottery");
        assert_eq!(FallbackParser.parse("POTTERY studio").brand_name, "Pottery Studio");
    }

    #[test]
    fn test_input_is_trimmed() {
        let idea = FallbackParser.parse("   candle making   ");
        assert_eq!(idea.raw, "candle making");
        assert_eq!(idea.brand_name, "Candle Making");
    }

    /// Every input yields one digital and one service offer, in some order.
    #[test]
    fn test_catalog_always_mixes_kinds() {
        let inputs = [
            "a pdf of recipes",
            "mentoring for students",
            "course and consulting combined",
            "plain old soap",
            "",
        ];
        for input in inputs {
            let idea = FallbackParser.parse(input);
            assert_eq!(idea.offers.len(), 2, "input: {input:?}");
            assert_eq!(
                idea.offers[0].kind,
                idea.offers[1].kind.opposite(),
                "input: {input:?}"
            );
            assert!(idea.offers.iter().all(|o| o.price.is_positive()));
        }
    }

    #[test]
    fn test_determinism() {
        let a = FallbackParser.parse("candle making workshop ideas");
        let b = FallbackParser.parse("candle making workshop ideas");
        assert_eq!(a.brand_name, b.brand_name);
        assert_eq!(a.offers, b.offers);
    }
}
