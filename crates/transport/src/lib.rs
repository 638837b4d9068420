//! Remote dialogue transport boundary. The orchestrator only sees the
//! [`DialogueTransport`] trait; the Watson Assistant implementation
//! speaks the authenticate-then-call pattern (a fresh IAM bearer token
//! per call). When no assistant is configured, [`OfflineTransport`]
//! fails every call so chat turns always exercise the local fallback.

mod relay;

use std::env;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use agro_core::locale;
use agro_core::models::Language;

pub use relay::TwilioRelay;

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const ASSISTANT_API_VERSION: &str = "2021-06-14";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote assistant is not configured")]
    Unavailable,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected remote response: {0}")]
    BadResponse(String),
}

pub trait DialogueTransport: Send + Sync {
    fn create_session(
        &self,
    ) -> impl std::future::Future<Output = Result<String, TransportError>> + Send;
    fn send_message(
        &self,
        session_id: &str,
        text: &str,
        lang: Language,
    ) -> impl std::future::Future<Output = Result<String, TransportError>> + Send;
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SessionCreatedResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct AssistantMessageResponse {
    output: AssistantOutput,
}

#[derive(Debug, Default, Deserialize)]
struct AssistantOutput {
    #[serde(default)]
    generic: Vec<AssistantGenericItem>,
}

#[derive(Debug, Deserialize)]
struct AssistantGenericItem {
    response_type: String,
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WatsonAssistantTransport {
    http: reqwest::Client,
    assistant_url: String,
    api_key: String,
    assistant_id: String,
}

impl WatsonAssistantTransport {
    pub fn new(assistant_url: String, api_key: String, assistant_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            assistant_url,
            api_key,
            assistant_id,
        }
    }

    /// Reads `AGRO_ASSISTANT_URL`, `AGRO_ASSISTANT_APIKEY`,
    /// `AGRO_ASSISTANT_ID`; absent any of them the remote channel stays
    /// unconfigured.
    pub fn from_env() -> Option<Self> {
        let assistant_url = env::var("AGRO_ASSISTANT_URL").ok()?;
        let api_key = env::var("AGRO_ASSISTANT_APIKEY").ok()?;
        let assistant_id = env::var("AGRO_ASSISTANT_ID").ok()?;
        Some(Self::new(assistant_url, api_key, assistant_id))
    }

    async fn iam_token(&self) -> Result<String, TransportError> {
        let response = self
            .http
            .post(IAM_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let token: IamTokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    fn session_url(&self, suffix: &str) -> String {
        format!(
            "{}/v2/assistants/{}/sessions{}?version={}",
            self.assistant_url, self.assistant_id, suffix, ASSISTANT_API_VERSION
        )
    }
}

impl DialogueTransport for WatsonAssistantTransport {
    async fn create_session(&self) -> Result<String, TransportError> {
        let token = self.iam_token().await?;
        let response = self
            .http
            .post(self.session_url(""))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()?;

        let created: SessionCreatedResponse = response.json().await?;
        debug!(session_id = %created.session_id, "created remote session");
        Ok(created.session_id)
    }

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        lang: Language,
    ) -> Result<String, TransportError> {
        let token = self.iam_token().await?;
        let context = if lang == Language::Hi {
            serde_json::json!({
                "skills": { "main skill": { "user_defined": { "language": "hi" } } }
            })
        } else {
            serde_json::json!({})
        };

        let response = self
            .http
            .post(self.session_url(&format!("/{session_id}/message")))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "input": { "text": text },
                "context": context,
            }))
            .send()
            .await?
            .error_for_status()?;

        let message: AssistantMessageResponse = response.json().await?;
        let texts: Vec<String> = message
            .output
            .generic
            .into_iter()
            .filter(|item| item.response_type == "text")
            .filter_map(|item| item.text)
            .collect();

        if texts.is_empty() {
            return Ok(locale::remote_unparsed(lang).to_string());
        }
        Ok(texts.join("\n\n"))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), TransportError> {
        let token = self.iam_token().await?;
        self.http
            .delete(self.session_url(&format!("/{session_id}")))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Stand-in transport for deployments without a remote assistant.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

impl DialogueTransport for OfflineTransport {
    async fn create_session(&self) -> Result<String, TransportError> {
        Err(TransportError::Unavailable)
    }

    async fn send_message(
        &self,
        _session_id: &str,
        _text: &str,
        _lang: Language,
    ) -> Result<String, TransportError> {
        Err(TransportError::Unavailable)
    }

    async fn delete_session(&self, _session_id: &str) -> Result<(), TransportError> {
        Err(TransportError::Unavailable)
    }
}

/// Concrete transport selection, dispatching like a small enum store so
/// app state stays non-generic.
#[derive(Debug, Clone)]
pub enum Transport {
    Watson(WatsonAssistantTransport),
    Offline(OfflineTransport),
}

impl Transport {
    pub fn from_env() -> Self {
        match WatsonAssistantTransport::from_env() {
            Some(watson) => Self::Watson(watson),
            None => Self::Offline(OfflineTransport),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Watson(_))
    }
}

impl DialogueTransport for Transport {
    async fn create_session(&self) -> Result<String, TransportError> {
        match self {
            Self::Watson(transport) => transport.create_session().await,
            Self::Offline(transport) => transport.create_session().await,
        }
    }

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        lang: Language,
    ) -> Result<String, TransportError> {
        match self {
            Self::Watson(transport) => transport.send_message(session_id, text, lang).await,
            Self::Offline(transport) => transport.send_message(session_id, text, lang).await,
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), TransportError> {
        match self {
            Self::Watson(transport) => transport.delete_session(session_id).await,
            Self::Offline(transport) => transport.delete_session(session_id).await,
        }
    }
}
