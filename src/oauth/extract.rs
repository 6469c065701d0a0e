//! Locating values within the provider's free-text responses.
//!
//! Tistory does not document these response shapes, so everything that
//! depends on them is kept here.

/// Finds the authorization code within the authorize response.
///
/// We look for our callback URL followed by `?code=`, and take everything up
/// to the next `'` on the same line.
pub fn authorization_code<'a>(body: &'a str, callback_url: &str) -> Option<&'a str> {
    let marker = format!("{callback_url}?code=");
    body.match_indices(&marker).find_map(|(index, _)| {
        let rest = &body[index + marker.len()..];
        let line = rest.lines().next()?;
        let end = line.find('\'')?;
        let code = &line[..end];
        (!code.is_empty()).then_some(code)
    })
}

/// Finds the access token within the token exchange response.
///
/// This is whatever follows the final `access_token=`, trimmed.
pub fn access_token(body: &str) -> Option<&str> {
    let (_, token) = body.rsplit_once("access_token=")?;
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_after_callback() {
        let body = "<script>window.location.href = 'redirect.example/cb?code=ABC123';</script>";
        assert_eq!(
            authorization_code(body, "redirect.example/cb"),
            Some("ABC123")
        );
    }

    #[test]
    fn ignores_other_urls_with_codes() {
        let body = "'other.example/cb?code=WRONG' then 'https://blog.example/cb?code=RIGHT'";
        assert_eq!(
            authorization_code(body, "https://blog.example/cb"),
            Some("RIGHT")
        );
    }

    #[test]
    fn missing_code_is_none() {
        assert_eq!(authorization_code("<html>login</html>", "redirect.example/cb"), None);
        // No terminating quote on the same line.
        assert_eq!(
            authorization_code("redirect.example/cb?code=ABC\n'", "redirect.example/cb"),
            None
        );
        assert_eq!(
            authorization_code("redirect.example/cb?code='", "redirect.example/cb"),
            None
        );
    }

    #[test]
    fn extracts_trimmed_token() {
        assert_eq!(access_token("foo=bar&access_token=  XYZ999  "), Some("XYZ999"));
        assert_eq!(access_token("access_token=abc\n"), Some("abc"));
    }

    #[test]
    fn token_uses_last_occurrence() {
        assert_eq!(
            access_token("access_token=first&access_token=second"),
            Some("second")
        );
    }

    #[test]
    fn missing_token_is_none() {
        assert_eq!(access_token("error=invalid_grant"), None);
        assert_eq!(access_token("access_token=   "), None);
    }
}
