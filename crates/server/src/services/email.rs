//! Email service for lead welcomes and order confirmations.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. The
//! whole service is optional: without SMTP configuration the application
//! runs with no outbound mail, and callers skip it.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use storeforge_core::OrderId;

use crate::config::EmailConfig;
use crate::models::OrderItemDetail;

/// HTML template for the lead welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    store_name: &'a str,
    store_url: &'a str,
}

/// Plain text template for the lead welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    store_name: &'a str,
    store_url: &'a str,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order_id: OrderId,
    items: &'a [OrderItemDetail],
    total: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order_id: OrderId,
    items: &'a [OrderItemDetail],
    total: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a welcome email to a newly captured lead.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_welcome(
        &self,
        to: &str,
        store_name: &str,
        store_url: &str,
    ) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml {
            store_name,
            store_url,
        }
        .render()?;
        let text = WelcomeEmailText {
            store_name,
            store_url,
        }
        .render()?;

        self.send_multipart_email(to, &format!("Welcome to {store_name}!"), &text, &html)
            .await
    }

    /// Send an order confirmation with the snapshot line items.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        order_id: OrderId,
        items: &[OrderItemDetail],
        total: &str,
    ) -> Result<(), EmailError> {
        let html = OrderConfirmationHtml {
            order_id,
            items,
            total,
        }
        .render()?;
        let text = OrderConfirmationText {
            order_id,
            items,
            total,
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Order Confirmation - #{order_id}"),
            &text,
            &html,
        )
        .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storeforge_core::Cents;

    #[test]
    fn test_welcome_templates_render() {
        let html = WelcomeEmailHtml {
            store_name: "Zen Flow",
            store_url: "https://example.com/@zen-flow",
        }
        .render()
        .unwrap();
        assert!(html.contains("Welcome to Zen Flow!"));
        assert!(html.contains("https://example.com/@zen-flow"));

        let text = WelcomeEmailText {
            store_name: "Zen Flow",
            store_url: "https://example.com/@zen-flow",
        }
        .render()
        .unwrap();
        assert!(text.contains("Welcome to Zen Flow!"));
    }

    #[test]
    fn test_order_confirmation_templates_render() {
        let items = vec![
            OrderItemDetail {
                name: "Starter Guide".to_string(),
                price: Cents::new(2900),
            },
            OrderItemDetail {
                name: "Consultation".to_string(),
                price: Cents::new(9900),
            },
        ];

        let html = OrderConfirmationHtml {
            order_id: OrderId::new(42),
            items: &items,
            total: "$128.00",
        }
        .render()
        .unwrap();
        assert!(html.contains("Order #42"));
        assert!(html.contains("Starter Guide"));
        assert!(html.contains("$29.00"));
        assert!(html.contains("$128.00"));

        let text = OrderConfirmationText {
            order_id: OrderId::new(42),
            items: &items,
            total: "$128.00",
        }
        .render()
        .unwrap();
        assert!(text.contains("Order #42"));
        assert!(text.contains("Consultation: $99.00"));
    }
}
