use std::fmt;

/// Known error messages returned by the API, and the kind each maps to.
///
/// Matching is by substring: the API tends to decorate messages.
const KNOWN_ERRORS: &[(&str, ErrorKind)] = &[
    ("access_token 이 유효하지 않습니다.", ErrorKind::AccessToken),
    ("블로그 정보가 없습니다.", ErrorKind::DoesNotExist),
    (
        "글이 존재하지 않거나, 범위가 유효하지 않습니다.",
        ErrorKind::DoesNotExist,
    ),
    (
        "글이 존재하지 않 거나 권한이 없습니다.",
        ErrorKind::DoesNotExistOrUnauthorized,
    ),
    (
        "글이 존재하지 않거나 권한이 없습니다.",
        ErrorKind::DoesNotExistOrUnauthorized,
    ),
    (
        "잘못된 파라미터 또는 요청 방식입니다.",
        ErrorKind::IncorrectParameterOrRequestMethod,
    ),
    ("이미지 파일이 아닙니다.", ErrorKind::NotAImage),
];

/// Symbolic classification of an API error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AccessToken,
    DoesNotExist,
    DoesNotExistOrUnauthorized,
    IncorrectParameterOrRequestMethod,
    NotAImage,
    Unknown,
}

impl ErrorKind {
    /// Classifies an error message against the known message table.
    pub fn classify(message: &str) -> Self {
        KNOWN_ERRORS
            .iter()
            .find(|(known, _)| message.contains(known))
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AccessToken => "access_token",
            ErrorKind::DoesNotExist => "does_not_exist",
            ErrorKind::DoesNotExistOrUnauthorized => "does_not_exist_or_unauthorized",
            ErrorKind::IncorrectParameterOrRequestMethod => {
                "incorrect_parameter_or_request_method"
            }
            ErrorKind::NotAImage => "not_a_image",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An application-level failure reported inside an API response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {status_code} ({kind}): {message}")]
pub struct ApiError {
    /// The original message, as sent by the API.
    pub message: String,
    pub kind: ErrorKind,
    pub status_code: i64,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: i64) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::classify(&message),
            message,
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_messages_are_classified() {
        assert_eq!(
            ErrorKind::classify("access_token 이 유효하지 않습니다."),
            ErrorKind::AccessToken
        );
        assert_eq!(
            ErrorKind::classify("블로그 정보가 없습니다."),
            ErrorKind::DoesNotExist
        );
        assert_eq!(
            ErrorKind::classify("글이 존재하지 않 거나 권한이 없습니다."),
            ErrorKind::DoesNotExistOrUnauthorized
        );
        assert_eq!(
            ErrorKind::classify("글이 존재하지 않거나 권한이 없습니다."),
            ErrorKind::DoesNotExistOrUnauthorized
        );
        assert_eq!(
            ErrorKind::classify("잘못된 파라미터 또는 요청 방식입니다."),
            ErrorKind::IncorrectParameterOrRequestMethod
        );
        assert_eq!(
            ErrorKind::classify("이미지 파일이 아닙니다."),
            ErrorKind::NotAImage
        );
    }

    #[test]
    fn classification_matches_substrings() {
        let message = "[post/read] 글이 존재하지 않거나, 범위가 유효하지 않습니다. (postId=3)";
        assert_eq!(ErrorKind::classify(message), ErrorKind::DoesNotExist);
    }

    #[test]
    fn unmatched_messages_are_unknown() {
        assert_eq!(ErrorKind::classify("서버 점검 중입니다."), ErrorKind::Unknown);
        assert_eq!(ErrorKind::classify(""), ErrorKind::Unknown);
    }

    #[test]
    fn api_error_keeps_original_message() {
        let error = ApiError::new("블로그 정보가 없습니다.", 404);
        assert_eq!(error.message, "블로그 정보가 없습니다.");
        assert_eq!(error.kind, ErrorKind::DoesNotExist);
        assert_eq!(error.status_code, 404);
        assert_eq!(error.kind.to_string(), "does_not_exist");
    }
}
