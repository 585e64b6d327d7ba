use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong during a single turn.
///
/// None of these are fatal to the conversation: the state layer guarantees
/// that a failed turn leaves the previous answers intact and usable.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network/connection failure, including timeouts. The caller may retry
    /// the whole turn.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 from either the token page or the RPC endpoint. Usually
    /// invalid or expired credentials.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    /// The anti-forgery marker was absent from the provider page. Either
    /// the page shape changed or the credentials hit a login wall.
    #[error("anti-forgery token not found in provider page")]
    TokenNotFound,

    /// The body does not match the expected framing or shape. Indicates
    /// provider format drift.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The provider returned zero candidate answers. A normal, recoverable
    /// outcome, to be shown as "couldn't answer".
    #[error("provider returned no answer")]
    NoAnswer,
}

impl ClientError {
    /// Whether a caller-side retry of the whole turn is reasonable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_retryable() {
        assert!(!ClientError::TokenNotFound.is_retryable());
        assert!(!ClientError::NoAnswer.is_retryable());
        assert!(!ClientError::UnexpectedStatus(StatusCode::FORBIDDEN).is_retryable());
        assert!(!ClientError::MalformedResponse("x".to_string()).is_retryable());
    }
}
