use super::{ApiError, EndpointPath, RawResponse, ResponseFormat, XmlDocument};
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};

/// The key JSON responses are wrapped within.
const JSON_ROOT: &str = "tistory";

const STATUS_FIELD: &str = "status";
const ERROR_MESSAGE_FIELD: &str = "error_message";

/// The status code the API uses to signal success.
pub const SUCCESS_STATUS: i64 = 200;

/// A parsed response body, in whichever format was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Xml(XmlDocument),
    /// The contents of the top-level `tistory` object.
    Json(Map<String, Value>),
}

impl ResponseBody {
    fn parse(format: ResponseFormat, text: &str) -> Result<Self> {
        match format {
            ResponseFormat::Xml => XmlDocument::parse(text).map(ResponseBody::Xml),
            ResponseFormat::Json => {
                let mut document: Map<String, Value> = serde_json::from_str(text)
                    .map_err(|e| Error::MalformedResponse(e.to_string()))?;
                match document.remove(JSON_ROOT) {
                    Some(Value::Object(contents)) => Ok(ResponseBody::Json(contents)),
                    _ => Err(Error::MalformedResponse(format!(
                        "missing `{JSON_ROOT}` object"
                    ))),
                }
            }
        }
    }

    /// Reads a top-level field as text, regardless of format.
    fn field(&self, name: &str) -> Option<String> {
        match self {
            ResponseBody::Xml(document) => document.find_text(name),
            ResponseBody::Json(contents) => match contents.get(name)? {
                Value::String(value) => Some(value.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            },
        }
    }
}

/// A response from the API, presented uniformly regardless of wire format.
#[derive(Debug, Clone)]
pub struct WrappedResponse {
    format: ResponseFormat,
    body: ResponseBody,
    text: String,
    endpoint: EndpointPath,
    headers: HeaderMap,
    status_code: i64,
}

impl WrappedResponse {
    /// Parses a raw response for the given endpoint.
    ///
    /// Fails if the body cannot be parsed, or carries no integer status.
    pub fn from_raw(
        format: ResponseFormat,
        endpoint: EndpointPath,
        raw: RawResponse,
    ) -> Result<Self> {
        let text = raw.text();
        let body = ResponseBody::parse(format, &text)?;
        let status = body
            .field(STATUS_FIELD)
            .ok_or_else(|| Error::MalformedResponse("missing status".to_string()))?;
        let status_code = status.trim().parse::<i64>().map_err(|_| {
            Error::MalformedResponse(format!("status is not an integer: {status}"))
        })?;

        Ok(Self {
            format,
            body,
            text,
            endpoint,
            headers: raw.headers,
            status_code,
        })
    }

    /// The status embedded within the response body.
    pub fn status_code(&self) -> i64 {
        self.status_code
    }

    /// The `error_message` field, if the API sent one.
    pub fn error_message(&self) -> Option<String> {
        self.body.field(ERROR_MESSAGE_FIELD)
    }

    /// Fails with an [`ApiError`] if the embedded status is not 200.
    pub fn raise_for_status(&self) -> Result<()> {
        if self.status_code == SUCCESS_STATUS {
            return Ok(());
        }
        let message = self.error_message().unwrap_or_default();
        Err(ApiError::new(message, self.status_code).into())
    }

    /// The format the body was parsed as.
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// The parsed body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// The response body as text, exactly as received.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The endpoint this response originated from.
    pub fn endpoint(&self) -> &EndpointPath {
        &self.endpoint
    }

    /// HTTP headers sent alongside the body.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `tistory` object, if this was a JSON response.
    pub fn as_json(&self) -> Option<&Map<String, Value>> {
        match &self.body {
            ResponseBody::Json(contents) => Some(contents),
            ResponseBody::Xml(_) => None,
        }
    }

    /// The parsed document, if this was an XML response.
    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match &self.body {
            ResponseBody::Xml(document) => Some(document),
            ResponseBody::Json(_) => None,
        }
    }

    /// Looks up a key within a JSON response.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json()?.get(key)
    }

    /// Looks up the text of an element within an XML response.
    pub fn find(&self, element: &str) -> Option<String> {
        self.as_xml()?.find_text(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;

    fn wrap(format: ResponseFormat, body: &str) -> Result<WrappedResponse> {
        let raw = RawResponse {
            headers: HeaderMap::new(),
            bytes: body.as_bytes().to_vec(),
        };
        let endpoint = EndpointPath::default().child("blog").child("info");
        WrappedResponse::from_raw(format, endpoint, raw)
    }

    #[test]
    fn json_status_is_read_from_wrapper() {
        let response = wrap(
            ResponseFormat::Json,
            r#"{"tistory": {"status": "200", "item": {"id": "1"}}}"#,
        )
        .unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.get("item").unwrap()["id"], "1");
        assert!(response.as_xml().is_none());
        assert_eq!(response.endpoint().to_string(), "blog/info");
        response.raise_for_status().unwrap();
    }

    #[test]
    fn json_numeric_status_is_accepted() {
        let response = wrap(ResponseFormat::Json, r#"{"tistory": {"status": 200}}"#).unwrap();
        assert_eq!(response.status_code(), 200);
    }

    #[test]
    fn xml_status_is_read_from_element() {
        let response = wrap(
            ResponseFormat::Xml,
            "<tistory><status>200</status><item><id>1</id></item></tistory>",
        )
        .unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.find("id").as_deref(), Some("1"));
        assert!(response.as_json().is_none());
        response.raise_for_status().unwrap();
    }

    #[test]
    fn json_error_is_classified() {
        let response = wrap(
            ResponseFormat::Json,
            r#"{"tistory":{"status":"404","error_message":"블로그 정보가 없습니다."}}"#,
        )
        .unwrap();
        let Err(Error::Api(error)) = response.raise_for_status() else {
            panic!("expected an API error");
        };
        assert_eq!(error.status_code, 404);
        assert_eq!(error.kind, ErrorKind::DoesNotExist);
        assert_eq!(error.message, "블로그 정보가 없습니다.");
    }

    #[test]
    fn xml_error_is_classified() {
        let response = wrap(
            ResponseFormat::Xml,
            "<tistory><status>401</status><error_message>access_token 이 유효하지 않습니다.</error_message></tistory>",
        )
        .unwrap();
        let Err(Error::Api(error)) = response.raise_for_status() else {
            panic!("expected an API error");
        };
        assert_eq!(error.status_code, 401);
        assert_eq!(error.kind, ErrorKind::AccessToken);
    }

    #[test]
    fn unrecognised_or_missing_messages_are_unknown() {
        let response = wrap(
            ResponseFormat::Json,
            r#"{"tistory":{"status":"500","error_message":"알 수 없는 오류"}}"#,
        )
        .unwrap();
        let Err(Error::Api(error)) = response.raise_for_status() else {
            panic!("expected an API error");
        };
        assert_eq!(error.kind, ErrorKind::Unknown);

        let response = wrap(ResponseFormat::Xml, "<tistory><status>403</status></tistory>").unwrap();
        let Err(Error::Api(error)) = response.raise_for_status() else {
            panic!("expected an API error");
        };
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert_eq!(error.message, "");
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(matches!(
            wrap(ResponseFormat::Json, r#"{"status": "200"}"#),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            wrap(ResponseFormat::Json, "not json"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            wrap(ResponseFormat::Xml, "<tistory><status>ok</status></tistory>"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            wrap(ResponseFormat::Xml, "<tistory></tistory>"),
            Err(Error::MalformedResponse(_))
        ));
    }
}
