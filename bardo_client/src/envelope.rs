//! Request envelope encoding for the batched RPC endpoint.
//!
//! The wire format is a fixed protocol quirk, not idiomatic serialization:
//! the session payload is serialized to JSON, then that *string* is embedded
//! as a JSON string literal inside an outer array, which is serialized
//! again. The double encoding must be reproduced byte-for-byte, including
//! empty strings (never null) for missing session-reference components.

use rand::Rng;
use serde_json::json;

use crate::SessionReference;

/// Build the doubly-encoded `f.req` payload for one turn.
///
/// Inner shape: `[[prompt], null, [conversation_id, response_id, choice_id]]`.
/// Outer shape: `[null, "<inner serialized as a string>"]`.
#[must_use]
pub fn encode_request(prompt: &str, reference: &SessionReference) -> String {
    let inner = json!([
        [prompt],
        null,
        [
            reference.conversation_id,
            reference.response_id,
            reference.choice_id,
        ],
    ])
    .to_string();

    json!([null, inner]).to_string()
}

/// The exactly-two form fields the endpoint accepts.
#[must_use]
pub fn form_fields(request: String, token: String) -> [(&'static str, String); 2] {
    [("f.req", request), ("at", token)]
}

/// Query parameters for the RPC call.
///
/// `bl` is the backend build label, `_reqid` a pseudo-random six-digit id
/// regenerated per call (collisions are tolerated; the backend does not
/// require global uniqueness), `rt=c` selects the standard response framing.
#[must_use]
pub fn query_params(build_label: &str) -> [(&'static str, String); 3] {
    let reqid = rand::thread_rng().gen_range(100_000..999_999);
    [
        ("bl", build_label.to_string()),
        ("_reqid", reqid.to_string()),
        ("rt", "c".to_string()),
    ]
}
