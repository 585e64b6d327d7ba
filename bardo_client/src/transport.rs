//! HTTP plumbing shared by the token fetch and the RPC call.
//!
//! The RPC response body is returned as raw bytes on purpose: the payload is
//! not valid JSON until the newline framing is stripped, so the generic JSON
//! helpers on the HTTP client cannot be used here.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::Credentials;
use crate::error::ClientError;

const DEFAULT_BASE_URL: &str = "https://gemini.google.com";
const STREAM_PATH: &str = "/_/BardChatUi/data/assistant.lamda.BardFrontendService/StreamGenerate";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/114.0.0.0 Safari/537.36 Edg/114.0.1823.82";

const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Fixed-header, cookie-authenticated HTTP access to the provider.
///
/// Performs no retries; a timeout or non-200 is surfaced immediately.
pub struct Transport {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    token_timeout: Duration,
    query_timeout: Duration,
}

impl Transport {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            token_timeout: DEFAULT_TOKEN_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_timeouts(mut self, token: Duration, query: Duration) -> Self {
        self.token_timeout = token;
        self.query_timeout = query;
        self
    }

    /// GET the provider root page (the one carrying the anti-forgery token).
    pub async fn get_token_page(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .header("Cookie", self.credentials.cookie_header())
            .timeout(self.token_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        Ok(response.text().await?)
    }

    /// POST one turn to the streaming RPC endpoint.
    ///
    /// Returns the unparsed body bytes; decoding is the caller's problem.
    pub async fn send(
        &self,
        form: &[(&str, String)],
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .post(format!("{}{STREAM_PATH}", self.base_url))
            .header("Cookie", self.credentials.cookie_header())
            .header("X-Same-Domain", "1")
            .header("Origin", &self.base_url)
            .header("Referer", format!("{}/", self.base_url))
            // set before .form(): its or_insert leaves an existing Content-Type alone,
            // and the backend wants the charset spelled out
            .header("Content-Type", "application/x-www-form-urlencoded;charset=UTF-8")
            .query(query)
            .form(form)
            .timeout(self.query_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        let body = response.bytes().await?;
        debug!("received {} raw bytes from RPC endpoint", body.len());
        Ok(body.to_vec())
    }
}
