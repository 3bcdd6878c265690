//! Outbound alert mail via an HTTP mail relay.
//!
//! SMTP itself stays behind the relay; this client only posts the rendered
//! message to the relay's send endpoint.

use serde::Serialize;

/// Client for the mail relay API.
pub struct MailerClient {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
    from: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

impl MailerClient {
    pub fn new(api_url: &str, api_token: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_token: api_token.to_string(),
            from: from.to_string(),
        }
    }

    /// Send one HTML mail to the full recipient list.
    pub async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html: &str,
    ) -> Result<(), MailerError> {
        let body = SendRequest {
            from: &self.from,
            to: recipients,
            subject,
            html,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(MailerError::Relay { status, detail });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail relay returned HTTP {status}: {detail}")]
    Relay {
        status: reqwest::StatusCode,
        detail: String,
    },
}
