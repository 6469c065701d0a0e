use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where tokens are written when no other path is given.
pub const DEFAULT_TOKEN_FILE: &str = "tistory_access_token.json";

/// The format of our JSON within token storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredToken {
    pub access_token: String,
}

impl StoredToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a previously written token file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&contents)
    }

    /// Writes this token to the given file, replacing any existing contents.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_json()?)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_object() {
        let token = StoredToken::new("XYZ999");
        assert_eq!(token.to_json().unwrap(), r#"{"access_token":"XYZ999"}"#);
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_TOKEN_FILE);

        StoredToken::new("XYZ999").save(&path).await.unwrap();
        let loaded = StoredToken::load(&path).await.unwrap();
        assert_eq!(loaded.access_token, "XYZ999");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let error = StoredToken::load(&path).await.unwrap_err();
        assert!(matches!(error, Error::Io { path: ref p, .. } if p == &path));
    }
}
