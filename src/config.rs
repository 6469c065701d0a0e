use crate::{
    api::DEFAULT_BASE_URL,
    oauth::{OAuthFlow, OAuthSession},
    Error, Result,
};
use reqwest::Client;
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, path::Path, time::Duration};

/// Our on-disk configuration.
///
/// ```json
/// {
///     "client": {
///         "client_id": "...",
///         "client_secret": "...",
///         "callback": "https://example.com/callback"
///     },
///     "cookies": { "TSSESSION": "..." }
/// }
/// ```
#[derive(Clone, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    /// Cookies from a logged-in browser session, used to authorize.
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// The registered Tistory application.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client", &self.client)
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("callback", &self.callback)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn session(&self) -> OAuthSession {
        OAuthSession {
            client_id: self.client.client_id.clone(),
            client_secret: self.client.client_secret.clone(),
            callback_url: self.client.callback.clone(),
            cookies: self.cookies.clone(),
        }
    }

    /// Creates an OAuth flow for the configured application and host.
    pub fn oauth_flow(&self) -> Result<OAuthFlow> {
        let mut client = Client::builder();
        if let Some(timeout) = self.timeout() {
            client = client.timeout(timeout);
        }
        OAuthFlow::with_client(self.session(), client.build()?, self.base_url())
    }
}
