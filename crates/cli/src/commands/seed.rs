//! Demo store seeding command.
//!
//! Provisions a store through the real provisioning service using the
//! deterministic parser, so seeded data exercises the same path as the
//! API.

use storeforge_server::db::{self, StoreRepository};
use storeforge_server::services::ai::{FallbackParser, IdeaParser};
use storeforge_server::services::provisioning;

use super::{CommandError, database_url};

/// Provision a demo store from a business idea.
///
/// # Errors
///
/// Returns an error if the database is unreachable or provisioning fails.
pub async fn run(idea: &str, publish: bool) -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let parser = IdeaParser::Deterministic(FallbackParser);
    let store = provisioning::create_store(&pool, &parser, idea).await?;

    if publish {
        StoreRepository::new(&pool)
            .publish(store.id)
            .await
            .map_err(provisioning::ProvisionError::from)?;
    }

    tracing::info!(
        store_id = %store.id,
        slug = %store.slug,
        brand = %store.brand_name,
        owner_token = %store.owner_token,
        published = publish,
        "Demo store provisioned"
    );
    Ok(())
}
