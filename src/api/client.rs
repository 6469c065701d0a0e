use super::{Endpoint, EndpointPath, ResponseFormat};
use crate::{Error, Result};
use reqwest::Client;
use std::{fmt, sync::Arc, time::Duration};
use url::Url;

/// Where Tistory lives, unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "https://www.tistory.com/";

/// The path all API endpoints live beneath.
const API_PATH: &str = "apis/";

/// State shared between a client and every endpoint derived from it.
pub(crate) struct ClientInner {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) access_token: String,
    pub(crate) format: ResponseFormat,
}

impl ClientInner {
    pub(crate) fn api_url(&self, path: &EndpointPath) -> Result<Url> {
        Ok(self.base_url.join(&format!("{API_PATH}{path}"))?)
    }
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // We never want our access token within logs.
        f.debug_struct("ClientInner")
            .field("base_url", &self.base_url.as_str())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// A client for the Tistory API, authenticated with an access token.
///
/// Endpoints are reached by name through [`Tistory::access`].
#[derive(Debug, Clone)]
pub struct Tistory {
    inner: Arc<ClientInner>,
}

impl Tistory {
    /// Create a new Tistory client around the given access token.
    ///
    /// # Errors
    ///
    /// - If the access token is empty.
    /// - If creating a [reqwest::Client] fails.
    pub fn new(access_token: impl Into<String>, format: ResponseFormat) -> Result<Self> {
        Self::builder(access_token).format(format).build()
    }

    /// Starts configuring a client around the given access token.
    pub fn builder(access_token: impl Into<String>) -> TistoryBuilder {
        TistoryBuilder {
            access_token: access_token.into(),
            format: ResponseFormat::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Begins an endpoint path with the given name.
    pub fn access(&self, name: impl Into<String>) -> Endpoint {
        self.root().access(name)
    }

    /// The endpoint with no path segments at all.
    pub fn root(&self) -> Endpoint {
        Endpoint::new(Arc::clone(&self.inner), EndpointPath::default())
    }

    /// The format responses are requested in.
    pub fn format(&self) -> ResponseFormat {
        self.inner.format
    }

    /// The host requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }
}

/// Configures a [`Tistory`] client.
#[derive(Debug, Clone)]
pub struct TistoryBuilder {
    access_token: String,
    format: ResponseFormat,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TistoryBuilder {
    /// Request responses in the given format. Defaults to XML.
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Use a different host, such as a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Give up on requests that take longer than this.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send a custom `User-Agent` with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fails if the access token is blank or the base URL is invalid.
    pub fn build(self) -> Result<Tistory> {
        if self.access_token.trim().is_empty() {
            return Err(Error::MissingAccessToken);
        }

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            http = http.user_agent(user_agent);
        }

        Ok(Tistory {
            inner: Arc::new(ClientInner {
                http: http.build()?,
                base_url: parse_base_url(&self.base_url)?,
                access_token: self.access_token,
                format: self.format,
            }),
        })
    }
}

/// Parses a base URL, ensuring relative joins land beneath it.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{base_url}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_access_token() {
        assert!(matches!(
            Tistory::new("", ResponseFormat::Xml),
            Err(Error::MissingAccessToken)
        ));
        assert!(matches!(
            Tistory::new("   ", ResponseFormat::Json),
            Err(Error::MissingAccessToken)
        ));
    }

    #[test]
    fn endpoint_urls_follow_access_order() {
        let tistory = Tistory::new("TOKEN", ResponseFormat::Json).unwrap();
        let endpoint = tistory.access("a").access("b").access("c");
        assert_eq!(
            endpoint.url().unwrap().as_str(),
            "https://www.tistory.com/apis/a/b/c"
        );
        assert_eq!(endpoint.path().to_string(), "a/b/c");
    }

    #[test]
    fn sibling_endpoints_are_independent() {
        let tistory = Tistory::new("TOKEN", ResponseFormat::Xml).unwrap();
        let post = tistory.access("post");
        let write = post.access("write");
        let list = post.access("list");
        assert_eq!(post.path().to_string(), "post");
        assert_eq!(write.path().to_string(), "post/write");
        assert_eq!(list.path().to_string(), "post/list");
    }

    #[test]
    fn custom_base_urls_gain_a_trailing_slash() {
        let tistory = Tistory::builder("TOKEN")
            .base_url("http://localhost:8080/proxy")
            .build()
            .unwrap();
        assert_eq!(tistory.format(), ResponseFormat::Xml);
        assert_eq!(
            tistory.access("blog").access("info").url().unwrap().as_str(),
            "http://localhost:8080/proxy/apis/blog/info"
        );
    }

    #[test]
    fn debug_output_hides_access_token() {
        let tistory = Tistory::new("SECRET-TOKEN", ResponseFormat::Xml).unwrap();
        assert!(!format!("{tistory:?}").contains("SECRET-TOKEN"));
    }
}
