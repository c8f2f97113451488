use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Http(reqwest::Error),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Http(e) => write!(f, "http client error: {e}"),
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

/// Why a single refresh attempt against the upstream did not succeed.
///
/// The `Display` output is what callers of the relay see in the `error`
/// field of a failed refresh.
#[derive(Debug)]
pub enum RefreshError {
    /// No admin token is configured; nothing was sent upstream.
    AdminTokenMissing,
    /// The upstream answered with something other than 200.
    Upstream { status: StatusCode, body: String },
    Transport(reqwest::Error),
    /// A 200 response whose body was not JSON.
    MalformedBody(serde_json::Error),
    /// A 200 response whose JSON body is not an object; holds the JSON kind.
    UnexpectedBody(&'static str),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::AdminTokenMissing => f.write_str("ADMIN_API_TOKEN not configured"),
            RefreshError::Upstream { status, body } => {
                write!(f, "HTTP {}: {}", status.as_u16(), body)
            }
            RefreshError::Transport(e) => write!(f, "{e}"),
            RefreshError::MalformedBody(e) => write!(f, "{e}"),
            RefreshError::UnexpectedBody(kind) => {
                write!(f, "expected a JSON object in refresh response, got {kind}")
            }
        }
    }
}

impl std::error::Error for RefreshError {}

impl From<reqwest::Error> for RefreshError {
    fn from(err: reqwest::Error) -> Self {
        RefreshError::Transport(err)
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(err: serde_json::Error) -> Self {
        RefreshError::MalformedBody(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_rejection_shows_code_and_raw_body() {
        let err = RefreshError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: service unavailable");
    }

    #[test]
    fn missing_admin_token_message() {
        assert_eq!(
            RefreshError::AdminTokenMissing.to_string(),
            "ADMIN_API_TOKEN not configured"
        );
    }

    #[test]
    fn malformed_body_shows_parser_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let expected = parse_err.to_string();
        assert_eq!(RefreshError::from(parse_err).to_string(), expected);
    }

    #[test]
    fn unexpected_body_names_the_json_kind() {
        assert_eq!(
            RefreshError::UnexpectedBody("array").to_string(),
            "expected a JSON object in refresh response, got array"
        );
    }

    #[test]
    fn config_error_display_includes_message() {
        let err = Error::Config("Invalid PORT 'abc'".into());
        assert!(err.to_string().contains("Invalid PORT 'abc'"));
    }
}
