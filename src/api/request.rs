use super::ResponseFormat;
use crate::{Error, Result};
use reqwest::{
    header::HeaderMap,
    multipart::{Form, Part},
};
use std::{collections::BTreeMap, path::Path};
use tracing::debug;

/// Parameters sent along with an endpoint call.
pub type Params = BTreeMap<String, String>;

/// The multipart field Tistory expects uploaded files within.
const UPLOAD_FIELD: &str = "uploadedfile";

/// The untouched result of an API request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Adds our access token and output format to the given parameters.
///
/// These are set last, so they always replace any caller-supplied value.
pub(crate) fn payload(mut params: Params, access_token: &str, format: ResponseFormat) -> Params {
    params.insert("access_token".to_string(), access_token.to_string());
    params.insert("output".to_string(), format.as_str().to_lowercase());
    params
}

/// Performs exactly one POST against the given API URL.
pub(crate) async fn execute(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
    params: Params,
    format: ResponseFormat,
    file: Option<&Path>,
) -> Result<RawResponse> {
    let payload = payload(params, access_token, format);

    let request = client.post(url);
    let request = match file {
        Some(path) => {
            debug!(url, path = %path.display(), "uploading file to API");
            request.multipart(upload_form(payload, path).await?)
        }
        None => {
            debug!(url, "calling API");
            request.form(&payload)
        }
    };

    // Transport-level failures are surfaced before we attempt to parse anything.
    let response = request.send().await?.error_for_status()?;
    let headers = response.headers().clone();
    let bytes = response.bytes().await?.to_vec();
    debug!(url, length = bytes.len(), "received API response");

    Ok(RawResponse { headers, bytes })
}

/// Builds a multipart form with our payload as text fields alongside the file.
///
/// The file name and MIME type come from the path as given. Symlinks are
/// not resolved, so a link named `photo.png` is uploaded as `photo.png`.
async fn upload_form(payload: Params, path: &Path) -> Result<Form> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let absolute = std::path::absolute(path).map_err(io_error)?;
    let Some(file_name) = absolute.file_name() else {
        return Err(Error::InvalidUploadPath(absolute));
    };
    let file_name = file_name.to_string_lossy().into_owned();
    let mime = mime_guess::from_path(&absolute).first_or_octet_stream();
    let contents = tokio::fs::read(&absolute).await.map_err(io_error)?;

    let part = Part::bytes(contents)
        .file_name(file_name)
        .mime_str(mime.essence_str())?;

    let form = payload
        .into_iter()
        .fold(Form::new(), |form, (key, value)| form.text(key, value));
    Ok(form.part(UPLOAD_FIELD, part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_adds_token_and_format() {
        let mut params = Params::new();
        params.insert("blogName".to_string(), "example".to_string());

        let payload = payload(params, "TOKEN", ResponseFormat::Json);
        assert_eq!(payload.len(), 3);
        assert_eq!(payload["blogName"], "example");
        assert_eq!(payload["access_token"], "TOKEN");
        assert_eq!(payload["output"], "json");
    }

    #[test]
    fn payload_overrides_caller_token_and_format() {
        let mut params = Params::new();
        params.insert("access_token".to_string(), "spoofed".to_string());
        params.insert("output".to_string(), "yaml".to_string());

        let payload = payload(params, "TOKEN", ResponseFormat::Xml);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload["access_token"], "TOKEN");
        assert_eq!(payload["output"], "xml");
    }

    #[tokio::test]
    async fn upload_paths_need_a_file_name() {
        let result = upload_form(Params::new(), Path::new("/")).await;
        assert!(matches!(result, Err(Error::InvalidUploadPath(ref p)) if p == Path::new("/")));

        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("photos").join("..");
        let result = upload_form(Params::new(), &parent).await;
        assert!(matches!(result, Err(Error::InvalidUploadPath(_))));
    }
}
