use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{
    config::Config,
    errors::{Error, RefreshError},
    telemetry::refresh::{RefreshTelemetry, RefreshTrigger},
    types::RefreshedToken,
};

/// Total deadline for the single upstream call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

const REFRESH_PATH: &str = "/admin/token/refresh";
const USER_AGENT: &str = concat!("token-guardian/", env!("CARGO_PKG_VERSION"));

/// Triggers a token refresh on the upstream service.
///
/// Every call makes at most one request. There is no retry and no state
/// carried between calls, so clones can be shared freely across tasks.
#[derive(Clone)]
pub struct RefreshRelay {
    http_client: Client,
    refresh_url: String,
    admin_token: String,
}

impl RefreshRelay {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: &Config, http_client: Client) -> Self {
        let base = config.upstream_base_url.trim_end_matches('/');
        RefreshRelay {
            http_client,
            refresh_url: format!("{base}{REFRESH_PATH}"),
            admin_token: config.admin_token.clone(),
        }
    }

    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }

    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<RefreshedToken, RefreshError> {
        let telemetry = RefreshTelemetry::new(trigger);
        telemetry.emit_start();
        let outcome = self.request_refresh().await;
        match &outcome {
            Ok(token) => telemetry.emit_success(token),
            Err(err) => telemetry.emit_failure(err),
        }
        outcome
    }

    async fn request_refresh(&self) -> Result<RefreshedToken, RefreshError> {
        if self.admin_token.is_empty() {
            return Err(RefreshError::AdminTokenMissing);
        }

        debug!("posting refresh request: url='{}'", self.refresh_url);
        let resp = self
            .http_client
            .post(&self.refresh_url)
            .header("X-Admin-Token", self.admin_token.as_str())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status == StatusCode::OK {
            let value: serde_json::Value = serde_json::from_str(&body)?;
            let token = RefreshedToken::from_body(&value)?;
            debug!(
                "upstream refresh ok: expires_at='{}'",
                token.expires_at.as_deref().unwrap_or("unknown")
            );
            Ok(token)
        } else {
            debug!("upstream refresh rejected: status={} body='{}'", status, body);
            Err(RefreshError::Upstream { status, body })
        }
    }
}
