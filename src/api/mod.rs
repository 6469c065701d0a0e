mod client;
mod endpoint;
mod error;
mod request;
mod response;
mod xml;

pub(crate) use client::parse_base_url;
pub use client::{Tistory, TistoryBuilder, DEFAULT_BASE_URL};
pub use endpoint::{Endpoint, EndpointPath};
pub use error::{ApiError, ErrorKind};
pub use request::{Params, RawResponse};
pub use response::{ResponseBody, WrappedResponse};
pub use xml::{XmlDocument, XmlElement};

use crate::Error;
use std::{fmt, str::FromStr};

/// The wire format responses are requested in.
///
/// This is chosen once per client, and every endpoint derived from it shares it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    #[default]
    Xml,
    Json,
}

impl ResponseFormat {
    /// The value sent within the `output` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => "xml",
            ResponseFormat::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(ResponseFormat::Xml),
            "json" => Ok(ResponseFormat::Json),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}
