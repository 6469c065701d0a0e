use super::{extract, OAuthSession};
use crate::{Error, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// The endpoint leveraged for obtaining an access token.
const ACCESS_TOKEN_ENDPOINT: &str = "oauth/access_token";

/// Exchanges the code from our authorization step for an access token.
/// Unlike authorization, no session cookie is sent.
pub(crate) async fn obtain_access_token(
    client: &Client,
    base_url: &Url,
    session: &OAuthSession,
    code: &str,
) -> Result<String> {
    let response = client
        .get(base_url.join(ACCESS_TOKEN_ENDPOINT)?)
        .query(&[
            ("client_id", session.client_id.as_str()),
            ("client_secret", session.client_secret.as_str()),
            ("redirect_uri", session.callback_url.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .error_for_status()?;

    // The response is plain text, not JSON: `access_token=<token>`.
    let body = response.text().await?;
    debug!(length = body.len(), "received access token response");

    extract::access_token(&body)
        .map(str::to_string)
        .ok_or(Error::UnexpectedResponse(
            "access token not found in token response",
        ))
}
