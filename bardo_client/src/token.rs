//! Anti-forgery token extraction.
//!
//! The provider embeds a short-lived XSRF value in its HTML page under the
//! `SNlM0e` key; every RPC call must echo it back in the `at` form field.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ClientError;
use crate::transport::Transport;

// e.g. SNlM0e":"AJWyuYX8NLX7SKFihs03g0AoLU-o:1689960334051"
#[allow(clippy::expect_used)]
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"SNlM0e":"([^"]+)""#).expect("token marker pattern is valid"));

/// Pull the anti-forgery value out of a provider page body.
pub(crate) fn extract_token(page: &str) -> Option<&str> {
    TOKEN_PATTERN
        .captures(page)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Fetch the provider root page and scrape the current token.
///
/// No retry here; the caller owns retry policy for the whole turn.
pub async fn fetch_token(transport: &Transport) -> Result<String, ClientError> {
    let page = transport.get_token_page().await?;

    let token = extract_token(&page).ok_or(ClientError::TokenNotFound)?;
    debug!("anti-forgery token refreshed");
    Ok(token.to_string())
}
