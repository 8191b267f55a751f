//! Customer notifications sent on behalf of the merchant.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. The only
//! mail the dashboard triggers today is the order status notification.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use ridgeline_core::OrderStatus;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the order status notification.
#[derive(Template)]
#[template(path = "email/order_status.html")]
struct OrderStatusEmailHtml<'a> {
    name: &'a str,
    reference: &'a str,
    status: OrderStatus,
    message: &'a str,
    store_url: &'a str,
}

/// Plain text template for the order status notification.
#[derive(Template)]
#[template(path = "email/order_status.txt")]
struct OrderStatusEmailText<'a> {
    name: &'a str,
    reference: &'a str,
    status: OrderStatus,
    message: &'a str,
    store_url: &'a str,
}

/// Customer-facing copy for each delivery status.
const fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Your order is being processed.",
        OrderStatus::OutForDelivery => {
            "Your order is out for delivery and will arrive soon."
        }
        OrderStatus::Delivered => {
            "Your order has been delivered. Thank you for shopping with us!"
        }
        OrderStatus::Cancelled => {
            "Your order has been cancelled. Please contact us if you have any questions."
        }
    }
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

/// Email service for dashboard-triggered customer notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    store_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport cannot be constructed.
    pub fn new(config: &EmailConfig, store_url: String) -> Result<Self, SmtpError> {
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
            store_url,
        })
    }

    /// Notify a customer that their order moved to a new status.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_order_status(
        &self,
        to: &str,
        name: &str,
        reference: &str,
        status: OrderStatus,
    ) -> Result<(), EmailError> {
        let message = status_message(status);

        let html = OrderStatusEmailHtml {
            name,
            reference,
            status,
            message,
            store_url: &self.store_url,
        }
        .render()?;
        let text = OrderStatusEmailText {
            name,
            reference,
            status,
            message,
            store_url: &self.store_url,
        }
        .render()?;

        let subject = format!("Order Status Update - {reference}");
        self.send_multipart_email(to, &subject, &text, &html).await
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
mod tests {
    use super::*;

    #[test]
    fn status_copy_covers_every_status() {
        assert_eq!(
            status_message(OrderStatus::Pending),
            "Your order is being processed."
        );
        assert_eq!(
            status_message(OrderStatus::OutForDelivery),
            "Your order is out for delivery and will arrive soon."
        );
        assert_eq!(
            status_message(OrderStatus::Delivered),
            "Your order has been delivered. Thank you for shopping with us!"
        );
        assert_eq!(
            status_message(OrderStatus::Cancelled),
            "Your order has been cancelled. Please contact us if you have any questions."
        );
    }

    #[test]
    fn text_template_renders_reference_and_copy() {
        let text = OrderStatusEmailText {
            name: "Ada",
            reference: "P-x7Kq2m",
            status: OrderStatus::OutForDelivery,
            message: status_message(OrderStatus::OutForDelivery),
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");

        assert!(text.contains("Ada"));
        assert!(text.contains("P-x7Kq2m"));
        assert!(text.contains("out for delivery"));
        assert!(text.contains("will arrive soon"));
    }

    #[test]
    fn html_template_escapes_nothing_it_should_not() {
        let html = OrderStatusEmailHtml {
            name: "Ada",
            reference: "P-x7Kq2m",
            status: OrderStatus::Delivered,
            message: status_message(OrderStatus::Delivered),
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");

        assert!(html.contains("P-x7Kq2m"));
        assert!(html.contains("https://shop.example.com"));
        assert!(html.contains("Thank you for shopping with us!"));
    }
}
