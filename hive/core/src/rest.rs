//! REST Companion Client
//!
//! Request/response access to the same backend the stream talks to. The
//! server exposes two synchronous endpoints next to the websocket:
//! - `POST /chat` - run one full discussion round and return every reply
//! - `GET /history` - fetch the server-side transcript
//!
//! Useful for scripting and for rehydrating a transcript before the
//! stream attaches. Interactive sessions should prefer the stream: the
//! synchronous round blocks until every agent has spoken.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agents::Speaker;
use crate::config::{ClientConfig, SessionConfig, DEFAULT_REST_BASE};

/// One agent's reply in a synchronous chat round
#[derive(Clone, Debug, Deserialize)]
pub struct AgentReply {
    /// The agent that replied
    pub agent: String,
    /// The reply text
    pub reply: String,
}

/// A transcript entry as the REST API reports it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Role field from the wire
    pub role: String,
    /// Agent field from the wire, when present
    #[serde(default)]
    pub agent: Option<String>,
    /// The message text
    pub content: String,
}

impl HistoryEntry {
    /// Who authored this entry, using the same mapping as the stream
    #[must_use]
    pub fn speaker(&self) -> Speaker {
        Speaker::from_wire(&self.role, self.agent.as_deref())
    }
}

/// Result of a synchronous chat round
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRound {
    /// Replies in speaking order
    pub responses: Vec<AgentReply>,
    /// Server-side transcript after the round
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// REST client for the companion API
#[derive(Clone)]
pub struct RestClient {
    /// Base URL, e.g. `http://127.0.0.1:8000`
    base: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl RestClient {
    /// Create a client for the given base URL
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from a [`ClientConfig`]
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.rest_base.clone())
    }

    /// Create from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let base =
            std::env::var("HIVE_REST_BASE").unwrap_or_else(|_| DEFAULT_REST_BASE.to_string());
        Self::new(base)
    }

    /// Get the chat endpoint URL
    fn chat_url(&self) -> String {
        format!("{}/chat", self.base)
    }

    /// Get the history endpoint URL
    fn history_url(&self) -> String {
        format!("{}/history", self.base)
    }

    /// Check whether the server answers at all
    pub async fn health_check(&self) -> bool {
        self.http_client
            .get(self.history_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    /// Run one synchronous discussion round
    ///
    /// Blocks until every agent has replied.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body does not parse.
    pub async fn chat(&self, message: &str, session: &SessionConfig) -> anyhow::Result<ChatRound> {
        let body = ChatBody {
            message,
            temperature: session.temperature,
        };

        let response = self
            .http_client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat endpoint returned {status}: {body}");
        }

        let round: ChatRound = response.json().await?;
        tracing::debug!(replies = round.responses.len(), "Synchronous round complete");
        Ok(round)
    }

    /// Fetch the server-side transcript
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body does not parse.
    pub async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        let response = self.http_client.get(self.history_url()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("History endpoint returned {status}");
        }

        let body: HistoryBody = response.json().await?;
        Ok(body.history)
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new(DEFAULT_REST_BASE)
    }
}
