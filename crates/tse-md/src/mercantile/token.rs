//! Session token value object and the two-token streaming session.

use serde_json::Value;
use tse_core::{Result, TseError};

/// A validated session token (connection token or message cursor).
///
/// Construction is the only way in, and it rejects anything that is not a
/// string of more than one character. An invalid value therefore never
/// reaches the session state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.chars().count() > 1 {
            Ok(Self(value))
        } else {
            Err(TseError::InvalidToken(format!(
                "{value:?}: must be a string with length greater than 1"
            )))
        }
    }

    /// Validate a token straight from a JSON response field.
    pub fn from_json(field: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => {
                Self::new(s.as_str()).map_err(|_| TseError::InvalidToken(format!("{field}={s:?} is too short")))
            }
            other => Err(TseError::InvalidToken(format!("{field} must be a string, got {other}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "Token({prefix}…)")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Streaming session state: connection token plus message cursor.
///
/// Both tokens are installed together by [`Session::establish`]; a session
/// is either fully usable or empty, never half-populated.
#[derive(Debug, Clone, Default)]
pub struct Session {
    connection_token: Option<Token>,
    message_cursor: Option<Token>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_token(&self) -> Option<&Token> {
        self.connection_token.as_ref()
    }

    pub fn message_cursor(&self) -> Option<&Token> {
        self.message_cursor.as_ref()
    }

    /// `true` once a handshake has installed both tokens.
    pub fn is_established(&self) -> bool {
        self.connection_token.is_some() && self.message_cursor.is_some()
    }

    pub fn establish(&mut self, connection_token: Token, message_cursor: Token) {
        self.connection_token = Some(connection_token);
        self.message_cursor = Some(message_cursor);
    }

    /// Install the server's next cursor. Only valid on an established session.
    pub fn advance(&mut self, next_cursor: Token) -> Result<()> {
        if self.connection_token.is_none() {
            return Err(TseError::HandshakeFailed("cannot advance cursor before handshake".into()));
        }
        self.message_cursor = Some(next_cursor);
        Ok(())
    }

    /// Drop both tokens; the next poll will re-handshake.
    pub fn reset(&mut self) {
        self.connection_token = None;
        self.message_cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn short_values_rejected() {
        assert!(matches!(Token::new(""), Err(TseError::InvalidToken(_))));
        assert!(matches!(Token::new("a"), Err(TseError::InvalidToken(_))));
        // one multi-byte character is still length 1
        assert!(matches!(Token::new("ث"), Err(TseError::InvalidToken(_))));
    }

    #[test]
    fn long_values_kept_verbatim() {
        for raw in ["ab", "d-9A1F,0|Bx,0|By,1", "x/y+z=="] {
            assert_eq!(Token::new(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn non_string_json_rejected() {
        assert!(matches!(Token::from_json("C", &json!(12345)), Err(TseError::InvalidToken(_))));
        assert!(matches!(Token::from_json("C", &Value::Null), Err(TseError::InvalidToken(_))));
        assert!(matches!(Token::from_json("C", &json!("z")), Err(TseError::InvalidToken(_))));
        assert_eq!(Token::from_json("C", &json!("cursor-1")).unwrap().as_str(), "cursor-1");
    }

    #[test]
    fn session_tokens_set_together() {
        let mut s = Session::new();
        assert!(!s.is_established());
        assert!(matches!(s.advance(Token::new("c2").unwrap()), Err(TseError::HandshakeFailed(_))));
        assert!(s.message_cursor().is_none());

        s.establish(Token::new("tok").unwrap(), Token::new("c1").unwrap());
        assert!(s.is_established());
        s.advance(Token::new("c2").unwrap()).unwrap();
        assert_eq!(s.message_cursor().unwrap().as_str(), "c2");
        assert_eq!(s.connection_token().unwrap().as_str(), "tok");

        s.reset();
        assert!(s.connection_token().is_none() && s.message_cursor().is_none());
    }

    #[test]
    fn debug_does_not_leak_full_token() {
        let t = Token::new("0123456789abcdef").unwrap();
        assert_eq!(format!("{t:?}"), "Token(01234567…)");
    }
}
