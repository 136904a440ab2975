//! Store provisioning: idea in, published-ready store with starter catalog
//! out.
//!
//! Uniqueness of brand name and slug is not checked up front. Each attempt
//! inserts atomically and relies on the database's unique constraints; a
//! conflict bumps a numeric suffix on both identifiers and tries again.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use storeforge_core::{Slug, slugify};

use crate::db::{NewStore, RepositoryError, StoreRepository};
use crate::models::Store;
use crate::services::ai::IdeaParser;

/// Upper bound on suffixed insert attempts before giving up.
const MAX_ATTEMPTS: u32 = 100;

/// Base slug used when the brand name slugifies to nothing.
const DEGENERATE_SLUG: &str = "store";

/// Errors from store provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The submitted idea was empty or whitespace.
    #[error("business idea is required")]
    EmptyIdea,

    /// No free identity was found within the attempt limit.
    #[error("could not find a unique store identity after {MAX_ATTEMPTS} attempts")]
    IdentityExhausted,

    /// Database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Create a store (and its two starter products) from a raw business idea.
///
/// The owner is anonymous: a fresh v4 UUID token identifies the store's
/// creator and is returned inside the store row for the client to keep.
///
/// # Errors
///
/// Returns `ProvisionError::EmptyIdea` for blank input,
/// `ProvisionError::IdentityExhausted` if every candidate identity was
/// taken, and `ProvisionError::Repository` on database failure.
#[instrument(skip(pool, parser, idea), fields(idea_len = idea.len()))]
pub async fn create_store(
    pool: &PgPool,
    parser: &IdeaParser,
    idea: &str,
) -> Result<Store, ProvisionError> {
    let idea = idea.trim();
    if idea.is_empty() {
        return Err(ProvisionError::EmptyIdea);
    }

    let parsed = parser.parse(idea).await;

    let base_slug = {
        let slug = slugify(&parsed.brand_name);
        if slug.is_empty() {
            DEGENERATE_SLUG.to_string()
        } else {
            slug
        }
    };

    let owner_token = Uuid::new_v4();
    let repo = StoreRepository::new(pool);

    for attempt in 0..MAX_ATTEMPTS {
        let (brand_name, slug) = candidate(&parsed.brand_name, &base_slug, attempt);

        let new_store = NewStore {
            owner_token,
            brand_name: &brand_name,
            slug: &slug,
            tagline: &parsed.tagline,
            description: &parsed.description,
            raw_idea: &parsed.raw,
        };

        match repo.create_with_products(&new_store, &parsed.offers).await {
            Ok(store) => {
                tracing::info!(store_id = %store.id, slug = %store.slug, "Store provisioned");
                return Ok(store);
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(%slug, attempt, "Store identity taken, retrying with suffix");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ProvisionError::IdentityExhausted)
}

/// The identity to try on the given attempt: the plain brand and slug
/// first, then both with an incrementing numeric suffix.
fn candidate(brand_name: &str, base_slug: &str, attempt: u32) -> (String, Slug) {
    if attempt == 0 {
        (brand_name.to_string(), Slug::from_text(base_slug))
    } else {
        (
            format!("{brand_name} {attempt}"),
            Slug::from_text(&format!("{base_slug}-{attempt}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_first_attempt_unsuffixed() {
        let (brand, slug) = candidate("Zen Flow", "zen-flow", 0);
        assert_eq!(brand, "Zen Flow");
        assert_eq!(slug.as_str(), "zen-flow");
    }

    #[test]
    fn test_candidate_suffixes_both_identifiers() {
        let (brand, slug) = candidate("Zen Flow", "zen-flow", 1);
        assert_eq!(brand, "Zen Flow 1");
        assert_eq!(slug.as_str(), "zen-flow-1");

        let (brand, slug) = candidate("Zen Flow", "zen-flow", 42);
        assert_eq!(brand, "Zen Flow 42");
        assert_eq!(slug.as_str(), "zen-flow-42");
    }

    #[test]
    fn test_suffixed_slugs_stay_valid() {
        // A suffixed slug must still be a valid slug as-is
        let (_, slug) = candidate("Zen Flow", "zen-flow", 7);
        assert_eq!(slugify(slug.as_str()), slug.as_str());
    }
}
