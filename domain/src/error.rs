//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree with `domain::error::Error` as the root,
/// holding an `error_kind` that says what went wrong and an optional `source` carrying the
/// underlying error (base64, JSON or I/O) that caused it. Token errors never cross the public
/// resolver functions, which map them to `None`; session errors are returned to the caller.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Token(TokenErrorKind),
    Session(SessionErrorKind),
}

/// Ways a bearer token can fail to yield claims, a role or a username.
#[derive(Debug, PartialEq)]
pub enum TokenErrorKind {
    /// Fewer than two dot-separated segments.
    MalformedToken,
    /// The payload segment is not valid base64.
    Decoding,
    /// The decoded payload is not a JSON object.
    Parse,
    /// The named claim is absent or empty.
    MissingClaim(String),
}

/// Errors from a `SessionStore`.
#[derive(Debug, PartialEq)]
pub enum SessionErrorKind {
    Io,
    Serialization,
    /// The persisted record is readable but violates a session invariant.
    Corrupt,
}

impl Error {
    /// True when the error only means "no such claim", as opposed to an unreadable token.
    pub fn is_missing_claim(&self) -> bool {
        matches!(
            self.error_kind,
            DomainErrorKind::Token(TokenErrorKind::MissingClaim(_))
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Token(TokenErrorKind::MissingClaim(claim)) => {
                write!(f, "Token error: missing claim `{claim}`")?
            }
            DomainErrorKind::Token(kind) => write!(f, "Token error: {kind:?}")?,
            DomainErrorKind::Session(kind) => write!(f, "Session error: {kind:?}")?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Token(TokenErrorKind::Decoding),
        }
    }
}

// JSON errors can come from either a token payload or a session file. Token decoding maps
// its own serde errors explicitly, so anything reaching this conversion is session data.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Session(SessionErrorKind::Serialization),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Session(SessionErrorKind::Io),
        }
    }
}

/// Helper function to create token errors.
pub fn token_error(kind: TokenErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Token(kind),
    }
}

/// Helper function to create session errors.
pub fn session_error(kind: SessionErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Session(kind),
    }
}
