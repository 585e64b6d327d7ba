//! The full turn pipeline: token fetch, envelope encode, send, decode.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::decode::{DecodedTurn, decode};
use crate::envelope::{encode_request, form_fields, query_params};
use crate::error::ClientError;
use crate::token::fetch_token;
use crate::transport::Transport;
use crate::{ChatBackend, Credentials, SessionReference};

const DEFAULT_BUILD_LABEL: &str = "boq_assistant-bard-web-server_20230718.13_p2";

/// Client for the Gemini web backend's batched RPC convention.
///
/// One [`ask`](ChatBackend::ask) is two sequential round trips: a GET for
/// the rotating anti-forgery token, then the POST carrying the envelope.
/// Both honor independent timeouts and neither is retried here.
pub struct GeminiClient {
    transport: Transport,
    build_label: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        info!("creating Gemini web client");
        Self {
            transport: Transport::new(credentials),
            build_label: DEFAULT_BUILD_LABEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.transport = self.transport.with_base_url(base_url);
        self
    }

    /// Override the backend build label sent as the `bl` query parameter.
    #[must_use]
    pub fn with_build_label(mut self, build_label: String) -> Self {
        self.build_label = build_label;
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, token: Duration, query: Duration) -> Self {
        self.transport = self.transport.with_timeouts(token, query);
        self
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn ask(
        &self,
        prompt: &str,
        reference: &SessionReference,
    ) -> Result<DecodedTurn, ClientError> {
        let token = fetch_token(&self.transport).await?;

        let request = encode_request(prompt, reference);
        let form = form_fields(request, token);
        let query = query_params(&self.build_label);

        let raw = self.transport.send(&form, &query).await?;
        let turn = decode(&raw)?;

        debug!(
            "turn decoded: {} candidate answer(s), conversation {}",
            turn.answer_count(),
            if turn.conversation_id.is_empty() {
                "<new>"
            } else {
                turn.conversation_id.as_str()
            }
        );
        Ok(turn)
    }
}
