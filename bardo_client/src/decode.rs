//! Decoder for the provider's newline-framed, doubly-nested response.
//!
//! The body of a successful RPC call is not a JSON document. It is a short
//! preamble followed by one line of JSON (always line index 3), and that
//! line in turn carries the real document serialized as a string at `[0][2]`.
//! Inside the real document, paths are positional: `1.0` / `1.1` hold the
//! new conversation and response ids, `4` the candidate answers.

use serde_json::Value;

use crate::MAX_ANSWERS;
use crate::error::ClientError;

/// One candidate reply recovered from a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAnswer {
    pub choice_id: String,
    pub content: String,
}

/// Everything a successful turn yields.
///
/// The conversation/response identity is shared across all candidates; only
/// the per-candidate choice id differs. `answers` holds between 1 and
/// [`MAX_ANSWERS`] entries.
#[derive(Debug, Clone)]
pub struct DecodedTurn {
    pub conversation_id: String,
    pub response_id: String,
    pub answers: Vec<DecodedAnswer>,
}

impl DecodedTurn {
    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }
}

/// Strip the framing and parse one turn out of the raw body bytes.
///
/// Identity paths are read tolerantly (a missing path yields an empty
/// string, matching the backend's habit of omitting fields), but a
/// malformed candidate fails the whole decode: partial answer sets are
/// never returned.
pub fn decode(raw: &[u8]) -> Result<DecodedTurn, ClientError> {
    let body = std::str::from_utf8(raw)
        .map_err(|e| ClientError::MalformedResponse(format!("body is not UTF-8: {e}")))?;

    // Payload is always the fourth line of the stream framing.
    let payload = body
        .split('\n')
        .nth(3)
        .ok_or_else(|| ClientError::MalformedResponse("fewer than 4 lines in body".to_string()))?;

    let outer: Value = serde_json::from_str(payload)
        .map_err(|e| ClientError::MalformedResponse(format!("payload line is not JSON: {e}")))?;

    // The real document is serialized as a string at [0][2].
    let nested = outer
        .get(0)
        .and_then(|envelope| envelope.get(2))
        .and_then(Value::as_str)
        .ok_or(ClientError::NoAnswer)?;

    let document: Value = serde_json::from_str(nested)
        .map_err(|e| ClientError::MalformedResponse(format!("nested document is not JSON: {e}")))?;

    let conversation_id = string_at(&document, &[1, 0]);
    let response_id = string_at(&document, &[1, 1]);

    let candidates = document
        .get(4)
        .and_then(Value::as_array)
        .filter(|candidates| !candidates.is_empty())
        .ok_or(ClientError::NoAnswer)?;

    let mut answers = Vec::with_capacity(MAX_ANSWERS);
    for candidate in candidates.iter().take(MAX_ANSWERS) {
        let choice_id = candidate
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::MalformedResponse("candidate is missing a choice id".to_string())
            })?;
        let content = candidate
            .get(1)
            .and_then(|parts| parts.get(0))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::MalformedResponse("candidate is missing content".to_string())
            })?;

        answers.push(DecodedAnswer {
            choice_id: choice_id.to_string(),
            content: content.to_string(),
        });
    }

    Ok(DecodedTurn {
        conversation_id,
        response_id,
        answers,
    })
}

/// Tolerant positional lookup: any missing step resolves to "".
fn string_at(value: &Value, path: &[usize]) -> String {
    let mut current = value;
    for index in path {
        match current.get(index) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}
