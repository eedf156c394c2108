//! GitHub OAuth plumbing: building the authorize URL and pulling the
//! authorization code back out of the callback query string.
//!
//! The token-exchange half of OAuth is deliberately absent — the deriver
//! consumes the raw code. See the module docs on [`crate::attestation`].

use crate::config;

/// Builds the GitHub authorization URL the user is sent to.
///
/// Scope is fixed to `read:user` — the minimum needed to anchor a profile.
/// `redirect_uri` should point at the application's `/github/callback`
/// route. No URL-encoding is applied; callers pass pre-encoded values.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&scope={}",
        config::GITHUB_AUTHORIZE_URL,
        client_id,
        redirect_uri,
        config::GITHUB_OAUTH_SCOPE,
    )
}

/// Extracts the `code` parameter from a callback query string.
///
/// Accepts the query with or without a leading `?`. Returns `None` when no
/// code parameter is present (the caller should surface an auth failure)
/// or when it is empty.
pub fn extract_callback_code(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "code")
        .map(|(_, value)| value.to_string())
        .filter(|code| !code.is_empty())
}
