mod authorize;
pub mod extract;
mod oauth_client;
mod storage;

pub use storage::{StoredToken, DEFAULT_TOKEN_FILE};

use crate::{api::DEFAULT_BASE_URL, Result};
use reqwest::Client;
use std::{
    collections::BTreeMap,
    fmt,
    path::Path,
    sync::{Mutex as StdMutex, PoisonError},
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

/// Everything needed to authorize on behalf of a logged-in user.
#[derive(Clone)]
pub struct OAuthSession {
    pub client_id: String,
    pub client_secret: String,
    /// The callback URL registered with the application.
    pub callback_url: String,
    /// Cookies of an authenticated browser session, by name.
    pub cookies: BTreeMap<String, String>,
}

impl OAuthSession {
    /// Renders our cookies as a single `Cookie` header value.
    pub(crate) fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }
}

impl fmt::Debug for OAuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSession")
            .field("client_id", &self.client_id)
            .field("callback_url", &self.callback_url)
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Where an [`OAuthFlow`] currently is.
///
/// This is updated as each step completes, so it can be observed while an
/// acquisition is still in flight.
#[derive(Clone, PartialEq, Eq)]
pub enum FlowState {
    Uninitialized,
    Authorizing,
    Authorized { code: String },
    TokenAcquired { token: String },
}

impl fmt::Debug for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowState::Uninitialized => "Uninitialized",
            FlowState::Authorizing => "Authorizing",
            FlowState::Authorized { .. } => "Authorized",
            FlowState::TokenAcquired { .. } => "TokenAcquired",
        })
    }
}

/// The two-step OAuth2 authorization code flow.
///
/// First, we authorize our application on behalf of the user via their
/// session cookie, and are handed an authorization code. That code is then
/// exchanged for an access token usable with [`crate::Tistory`].
///
/// The token is acquired lazily and cached. Concurrent callers wait on a
/// single acquisition rather than each performing their own.
#[derive(Debug)]
pub struct OAuthFlow {
    client: Client,
    base_url: Url,
    session: OAuthSession,
    state: StdMutex<FlowState>,
    /// Held for the duration of an acquisition.
    acquisition: Mutex<()>,
}

impl OAuthFlow {
    /// Creates a flow against Tistory itself.
    pub fn new(session: OAuthSession) -> Result<Self> {
        Self::with_client(session, Client::builder().build()?, DEFAULT_BASE_URL)
    }

    /// Creates a flow using the given HTTP client and host.
    pub fn with_client(session: OAuthSession, client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: crate::api::parse_base_url(base_url)?,
            session,
            state: StdMutex::new(FlowState::Uninitialized),
            acquisition: Mutex::new(()),
        })
    }

    /// The application and browser session we authorize with.
    pub fn session(&self) -> &OAuthSession {
        &self.session
    }

    /// A snapshot of where the flow currently is.
    pub fn state(&self) -> FlowState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, state: FlowState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Returns our access token, running the flow if we do not have one yet.
    pub async fn access_token(&self) -> Result<String> {
        let _acquisition = self.acquisition.lock().await;
        if let FlowState::TokenAcquired { token } = self.state() {
            return Ok(token);
        }
        self.run().await
    }

    /// Runs the flow from the beginning, replacing any cached token.
    ///
    /// If this fails, a previously acquired token is kept.
    pub async fn start(&self) -> Result<String> {
        let _acquisition = self.acquisition.lock().await;
        self.run().await
    }

    /// Writes our access token to the given file, acquiring one if necessary.
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let token = self.access_token().await?;
        StoredToken::new(token).save(path).await
    }

    async fn run(&self) -> Result<String> {
        let previous = self.state();
        let result = self.acquire().await;
        if let Err(error) = &result {
            warn!(%error, "unable to acquire access token");
            match previous {
                FlowState::TokenAcquired { .. } => self.set_state(previous),
                _ => self.set_state(FlowState::Uninitialized),
            }
        }
        result
    }

    async fn acquire(&self) -> Result<String> {
        self.set_state(FlowState::Authorizing);
        let code =
            authorize::perform_authorize_request(&self.client, &self.base_url, &self.session)
                .await?;
        self.set_state(FlowState::Authorized { code: code.clone() });

        let token = oauth_client::obtain_access_token(
            &self.client,
            &self.base_url,
            &self.session,
            &code,
        )
        .await?;

        info!(client_id = %self.session.client_id, "acquired access token");
        self.set_state(FlowState::TokenAcquired {
            token: token.clone(),
        });
        Ok(token)
    }
}
