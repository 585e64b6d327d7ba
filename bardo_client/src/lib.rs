#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Wire-level client for the undocumented Gemini web backend.
//!
//! The backend is not a documented JSON API: requests go through a batched
//! RPC endpoint taking a double-encoded JSON envelope as a form field, and
//! responses are newline-framed with the real JSON document nested as a
//! string inside another JSON document. This crate reproduces that wire
//! contract exactly and exposes one operation: send a prompt for a given
//! conversation branch, get back up to three alternative answers.

use std::fmt;

use async_trait::async_trait;

mod client;
mod decode;
mod envelope;
mod error;
mod token;
mod transport;

pub use client::GeminiClient;
pub use decode::{DecodedAnswer, DecodedTurn, decode};
pub use envelope::{encode_request, form_fields, query_params};
pub use error::ClientError;
pub use token::fetch_token;
pub use transport::Transport;

/// The backend returns at most three alternative answers per turn.
pub const MAX_ANSWERS: usize = 3;

/// The triple identifying a conversation branch with the provider.
///
/// All three components are opaque provider-issued strings. Empty strings
/// are valid and mean "start a new conversation".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReference {
    pub conversation_id: String,
    pub response_id: String,
    pub choice_id: String,
}

impl SessionReference {
    #[must_use]
    pub const fn new(conversation_id: String, response_id: String, choice_id: String) -> Self {
        Self {
            conversation_id,
            response_id,
            choice_id,
        }
    }

    /// True when no turn has been decoded yet for this branch.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.conversation_id.is_empty() && self.response_id.is_empty() && self.choice_id.is_empty()
    }
}

/// The two authentication cookies scraped from a logged-in browser session.
///
/// Supplied once at process start and treated as immutable secrets. The
/// `Debug` impl redacts both values so they cannot leak through logs.
#[derive(Clone)]
pub struct Credentials {
    psid: String,
    psidts: String,
}

impl Credentials {
    #[must_use]
    pub const fn new(psid: String, psidts: String) -> Self {
        Self { psid, psidts }
    }

    /// Read `PSID` / `PSIDTS` from the environment.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let psid = std::env::var("PSID").ok().filter(|v| !v.is_empty())?;
        let psidts = std::env::var("PSIDTS").ok().filter(|v| !v.is_empty())?;
        Some(Self::new(psid, psidts))
    }

    /// Render the `Cookie` header value the provider expects.
    #[must_use]
    pub(crate) fn cookie_header(&self) -> String {
        format!(
            "__Secure-1PSID={}; __Secure-1PSIDTS={}",
            self.psid, self.psidts
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("psid", &"[redacted]")
            .field("psidts", &"[redacted]")
            .finish()
    }
}

/// Seam between the conversation layer and the wire-level client.
///
/// One call is one turn: a prompt plus the reference of the branch to
/// continue, yielding a fresh reference and up to [`MAX_ANSWERS`] answers.
/// Implementations must not retry internally; retry policy belongs to the
/// caller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(
        &self,
        prompt: &str,
        reference: &SessionReference,
    ) -> Result<DecodedTurn, ClientError>;
}
