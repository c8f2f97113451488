use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::RefreshError;

/// Expiry details the upstream reports after a successful refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshedToken {
    pub expires_at: Option<String>,
    pub expires_in_seconds: Option<i64>,
}

impl RefreshedToken {
    /// Picks the known fields out of an upstream body. A body that is not a
    /// JSON object is rejected; missing or mistyped fields are left as `None`.
    pub fn from_body(body: &Value) -> Result<Self, RefreshError> {
        let fields = body
            .as_object()
            .ok_or_else(|| RefreshError::UnexpectedBody(json_kind(body)))?;
        Ok(Self::from_fields(fields))
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        RefreshedToken {
            expires_at: fields
                .get("expires_at")
                .and_then(Value::as_str)
                .map(str::to_owned),
            expires_in_seconds: fields.get("expires_in_seconds").and_then(Value::as_i64),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Canonical outcome of one relay invocation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RefreshResult {
    pub success: bool,
    pub expires_at: Option<String>,
    pub expires_in_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<RefreshedToken, RefreshError>> for RefreshResult {
    fn from(outcome: Result<RefreshedToken, RefreshError>) -> Self {
        match outcome {
            Ok(token) => RefreshResult {
                success: true,
                expires_at: token.expires_at,
                expires_in_seconds: token.expires_in_seconds,
                error: None,
            },
            Err(err) => RefreshResult {
                success: false,
                expires_at: None,
                expires_in_seconds: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub timestamp: String,
    pub withings_mcp_url: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub config: ConfigFlags,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigFlags {
    pub withings_mcp_configured: bool,
    pub admin_token_configured: bool,
    pub guardian_secret_configured: bool,
    pub railway_token_configured: bool,
}

#[derive(Serialize)]
pub struct RefreshSucceeded {
    pub success: bool,
    pub message: &'static str,
    pub expires_at: Option<String>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct RefreshFailed {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub detail: &'static str,
}
