// Bearer Token
//
// Resolution order: configured secret, then environment. There is no
// built-in fallback; a missing token is a configuration error.

use crate::domain::error::{DomainError, Result};

/// Secret used in the `Authorization: Bearer` header
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(DomainError::ValidationError(
                "Bearer token cannot be empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// First non-blank candidate wins; `None` when every source is empty
    pub fn resolve<I>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find_map(|candidate| Self::new(candidate).ok())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Header value including the scheme
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        let token = BearerToken::resolve([Some("secret".to_string()), Some("env".to_string())]);
        assert_eq!(token.unwrap().expose(), "secret");

        let token = BearerToken::resolve([None, Some("env".to_string())]);
        assert_eq!(token.unwrap().expose(), "env");

        let token = BearerToken::resolve([Some("  ".to_string()), Some("env".to_string())]);
        assert_eq!(token.unwrap().expose(), "env");
    }

    #[test]
    fn test_resolve_fails_closed() {
        assert!(BearerToken::resolve([None, None]).is_none());
        assert!(BearerToken::resolve([Some(String::new())]).is_none());
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = BearerToken::new("test-token-123").unwrap();
        assert_eq!(format!("{:?}", token), "BearerToken(***)");
        assert_eq!(token.header_value(), "Bearer test-token-123");
    }
}
