//! Outbound WhatsApp messaging relay (Twilio). Used exactly once per
//! new contact to send the welcome message; everything else about the
//! WhatsApp channel arrives through the inbound webhook.

use std::env;

use serde::Deserialize;
use tracing::info;

use crate::TransportError;

const WELCOME_BODY: &str = "Welcome to AgriConnect! You are now connected to our WhatsApp service. You can ask questions about sugarcane farming anytime.";

#[derive(Debug, Deserialize)]
struct MessageCreatedResponse {
    sid: String,
}

#[derive(Debug, Clone)]
pub struct TwilioRelay {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    whatsapp_number: String,
}

impl TwilioRelay {
    pub fn new(account_sid: String, auth_token: String, whatsapp_number: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid,
            auth_token,
            whatsapp_number,
        }
    }

    pub fn from_env() -> Option<Self> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN").ok()?;
        let whatsapp_number = env::var("TWILIO_WHATSAPP_NUMBER").ok()?;
        Some(Self::new(account_sid, auth_token, whatsapp_number))
    }

    /// Sends the fixed welcome message and returns the provider message id.
    pub async fn send_welcome(&self, phone_number: &str) -> Result<String, TransportError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("From", format!("whatsapp:{}", self.whatsapp_number)),
                ("To", format!("whatsapp:{phone_number}")),
                ("Body", WELCOME_BODY.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let created: MessageCreatedResponse = response.json().await?;
        info!(message_id = %created.sid, "sent whatsapp welcome");
        Ok(created.sid)
    }
}
