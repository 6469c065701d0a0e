use super::{extract, OAuthSession};
use crate::{Error, Result};
use reqwest::{header, Client};
use tracing::debug;
use url::Url;

/// The path to the authorization endpoint, relative to our base URL.
const AUTHORIZATION_ENDPOINT: &str = "oauth/authorize";

/// Performs OAuth2 authorization, obtaining a code we can exchange for an access token.
///
/// This relies on the user's session cookie: Tistory will happily authorize
/// on their behalf, and reply with a page referencing our callback.
pub(crate) async fn perform_authorize_request(
    client: &Client,
    base_url: &Url,
    session: &OAuthSession,
) -> Result<String> {
    let mut request = client
        .get(base_url.join(AUTHORIZATION_ENDPOINT)?)
        // Standard OAuth2 query parameters.
        .query(&[
            ("client_id", session.client_id.as_str()),
            ("redirect_uri", session.callback_url.as_str()),
            ("response_type", "code"),
        ]);
    if let Some(cookie) = session.cookie_header() {
        request = request.header(header::COOKIE, cookie);
    }

    let response = request.send().await?.error_for_status()?;
    let body = response.text().await?;
    debug!(length = body.len(), "received authorization response");

    extract::authorization_code(&body, &session.callback_url)
        .map(str::to_string)
        .ok_or(Error::UnexpectedResponse(
            "authorization code not found in authorize response",
        ))
}
