//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::ai::{ClaudeParser, FallbackParser, IdeaParser, ResilientParser};
use crate::services::email::EmailService;
use crate::services::stripe::StripeClient;

/// Application state shared across request handlers.
///
/// Cheap to clone: the inner state lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    stripe: StripeClient,
    parser: IdeaParser,
    email: Option<EmailService>,
}

impl AppState {
    /// Assemble application state from configuration and a connected pool.
    ///
    /// The idea parser is generative when an Anthropic key is configured and
    /// deterministic otherwise; the email service is present only with SMTP
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let stripe = StripeClient::new(&config.stripe.secret_key);

        let parser = match &config.anthropic {
            Some(anthropic) => {
                tracing::info!(model = %anthropic.model, "Using generative idea parser");
                IdeaParser::Generative(ResilientParser::new(ClaudeParser::new(
                    &anthropic.api_key,
                    anthropic.model.clone(),
                )))
            }
            None => {
                tracing::info!("No Anthropic API key configured, using deterministic idea parser");
                IdeaParser::Deterministic(FallbackParser)
            }
        };

        let email = match &config.email {
            Some(email_config) => Some(EmailService::new(email_config)?),
            None => {
                tracing::info!("No SMTP configured, outgoing email disabled");
                None
            }
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
                parser,
                email,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    #[must_use]
    pub fn parser(&self) -> &IdeaParser {
        &self.inner.parser
    }

    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// The public URL of a store's storefront page.
    #[must_use]
    pub fn store_url(&self, slug: &str) -> String {
        format!("{}/@{slug}", self.inner.config.base_url)
    }
}
