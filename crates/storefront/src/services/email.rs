//! Email service for customer-facing transactional mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    name: &'a str,
    email: &'a str,
    generated_password: Option<&'a str>,
    store_url: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    name: &'a str,
    email: &'a str,
    generated_password: Option<&'a str>,
    store_url: &'a str,
}

/// HTML template for the temporary password email.
#[derive(Template)]
#[template(path = "email/temp_password.html")]
struct TempPasswordEmailHtml<'a> {
    name: &'a str,
    temp_password: &'a str,
    store_url: &'a str,
}

/// Plain text template for the temporary password email.
#[derive(Template)]
#[template(path = "email/temp_password.txt")]
struct TempPasswordEmailText<'a> {
    name: &'a str,
    temp_password: &'a str,
    store_url: &'a str,
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

    /// Send the welcome email after registration.
    ///
    /// When the account password was generated server-side, it is included
    /// so the customer can log in.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_welcome(
        &self,
        to: &str,
        name: &str,
        generated_password: Option<&str>,
    ) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml {
            name,
            email: to,
            generated_password,
            store_url: &self.store_url,
        }
        .render()?;
        let text = WelcomeEmailText {
            name,
            email: to,
            generated_password,
            store_url: &self.store_url,
        }
        .render()?;

        self.send_multipart_email(to, "Welcome to Ridgeline Apparel", &text, &html)
            .await
    }

    /// Send a temporary password for account recovery.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_temp_password(
        &self,
        to: &str,
        name: &str,
        temp_password: &str,
    ) -> Result<(), EmailError> {
        let html = TempPasswordEmailHtml {
            name,
            temp_password,
            store_url: &self.store_url,
        }
        .render()?;
        let text = TempPasswordEmailText {
            name,
            temp_password,
            store_url: &self.store_url,
        }
        .render()?;

        self.send_multipart_email(to, "Your Ridgeline temporary password", &text, &html)
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
mod tests {
    use super::*;

    #[test]
    fn welcome_template_includes_generated_password() {
        let text = WelcomeEmailText {
            name: "Ada",
            email: "ada@example.com",
            generated_password: Some("a1b2c3d4"),
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");

        assert!(text.contains("Ada"));
        assert!(text.contains("a1b2c3d4"));
        assert!(text.contains("https://shop.example.com"));
    }

    #[test]
    fn welcome_template_omits_password_line_when_chosen_by_customer() {
        let text = WelcomeEmailText {
            name: "Ada",
            email: "ada@example.com",
            generated_password: None,
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");

        assert!(!text.contains("password:"));
    }

    #[test]
    fn temp_password_templates_carry_the_password() {
        let html = TempPasswordEmailHtml {
            name: "Ada",
            temp_password: "XKQmrt42",
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");
        let text = TempPasswordEmailText {
            name: "Ada",
            temp_password: "XKQmrt42",
            store_url: "https://shop.example.com",
        }
        .render()
        .expect("renders");

        assert!(html.contains("XKQmrt42"));
        assert!(text.contains("XKQmrt42"));
        assert!(text.contains("24 hours"));
    }
}
