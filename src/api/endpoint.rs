use super::{client::ClientInner, request, Params, WrappedResponse};
use crate::Result;
use std::{fmt, path::Path, sync::Arc};
use url::Url;

/// An ordered list of endpoint names, e.g. `post` then `write`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EndpointPath {
    segments: Vec<String>,
}

impl EndpointPath {
    /// Returns a new path with `segment` appended.
    ///
    /// Empty segments are ignored.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        let mut segments = self.segments.clone();
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }

    /// Each name in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl<S: Into<String>> FromIterator<S> for EndpointPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .fold(EndpointPath::default(), |path, segment| path.child(segment))
    }
}

/// A (possibly partial) API endpoint.
///
/// Endpoints are built up name by name via [`Endpoint::access`], and
/// executed with [`Endpoint::invoke`]:
///
/// ```no_run
/// # async fn example(tistory: tistory::Tistory) -> tistory::Result<()> {
/// let response = tistory
///     .access("post")
///     .access("write")
///     .call([("blogName", "example"), ("title", "Hello")])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: Arc<ClientInner>,
    path: EndpointPath,
}

impl Endpoint {
    pub(crate) fn new(client: Arc<ClientInner>, path: EndpointPath) -> Self {
        Self { client, path }
    }

    /// Returns a new endpoint one level deeper.
    pub fn access(&self, name: impl Into<String>) -> Self {
        Self {
            client: Arc::clone(&self.client),
            path: self.path.child(name),
        }
    }

    /// The names leading to this endpoint.
    pub fn path(&self) -> &EndpointPath {
        &self.path
    }

    /// The full URL this endpoint is requested at.
    pub fn url(&self) -> Result<Url> {
        self.client.api_url(&self.path)
    }

    /// Calls this endpoint, optionally uploading a file.
    ///
    /// The returned response has not been checked for an API-level error;
    /// see [`WrappedResponse::raise_for_status`].
    pub async fn invoke<I, K, V>(&self, params: I, file: Option<&Path>) -> Result<WrappedResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let params: Params = params
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();
        let url = self.url()?;
        let format = self.client.format;

        let raw = request::execute(
            &self.client.http,
            url.as_str(),
            &self.client.access_token,
            params,
            format,
            file,
        )
        .await?;
        WrappedResponse::from_raw(format, self.path.clone(), raw)
    }

    /// Calls this endpoint and fails if the API reports anything but success.
    pub async fn call<I, K, V>(&self, params: I) -> Result<WrappedResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let response = self.invoke(params, None).await?;
        response.raise_for_status()?;
        Ok(response)
    }
}
