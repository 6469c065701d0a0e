//! A client for Tistory's blog API.
//!
//! Endpoints are addressed by name, and invoked as form POSTs:
//!
//! ```no_run
//! use tistory::{ResponseFormat, Tistory};
//!
//! # async fn example() -> tistory::Result<()> {
//! let tistory = Tistory::new("access token", ResponseFormat::Json)?;
//! let response = tistory
//!     .access("blog")
//!     .access("info")
//!     .call(tistory::api::Params::new())
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! Access tokens are obtained through [`oauth::OAuthFlow`].

pub mod api;
pub mod config;
mod error;
pub mod oauth;

pub use api::{ApiError, Endpoint, ErrorKind, ResponseFormat, Tistory, WrappedResponse};
pub use config::Config;
pub use error::{Error, Result};
pub use oauth::{OAuthFlow, OAuthSession};
