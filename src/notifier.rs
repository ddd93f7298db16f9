//! Transactional email collaborator. Calls are fire-and-forget from the
//! order service's point of view: a failed send is logged, never rolled back.

use async_trait::async_trait;
use serde_json::json;

use crate::config::Config;
use crate::error::ApiError;
use crate::retry::with_retry;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError>;
}

pub struct HttpNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        }
    }

    async fn send_once(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|err| ApiError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "Mail service returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError> {
        with_retry("mail send", || self.send_once(to, subject, html)).await
    }
}

pub fn order_created_email() -> (&'static str, String) {
    (
        "Transaction Successful",
        email_body(
            "Thank you for your order!",
            "Your transaction has been placed. We sincerely appreciate your business and thank you for choosing us!",
        ),
    )
}

pub fn order_completed_email() -> (&'static str, String) {
    (
        "Congratulations! Your Transaction is Completed",
        email_body(
            "Congratulations!",
            "Your transaction has been successfully completed. We appreciate your business and thank you for choosing us!",
        ),
    )
}

fn email_body(heading: &str, text: &str) -> String {
    format!(
        "<html><body><div class=\"container\"><h1>{}</h1><p>{}</p></div></body></html>",
        heading, text
    )
}
