//! read configuration from the process environment

use crate::errors::Error;

pub const DEFAULT_UPSTREAM_URL: &str = "https://withings-mcp-production.up.railway.app";
pub const DEFAULT_PORT: u16 = 8081;

/// Process-wide settings, built once at startup and never reloaded.
///
/// # ENV Vars
/// * `WITHINGS_MCP_URL` - Base URL of the upstream service (default: the production deployment)
/// * `ADMIN_API_TOKEN` - Credential sent upstream as `X-Admin-Token`
/// * `GUARDIAN_SECRET` - Shared secret expected from callers; empty disables the check
/// * `RAILWAY_TOKEN`, `RAILWAY_PROJECT_ID`, `RAILWAY_SERVICE_ID` - Deployment settings, read but unused
/// * `PORT` - Listen port (default: 8081)
#[derive(Clone, Debug)]
pub struct Config {
    pub upstream_base_url: String,
    pub admin_token: String,
    pub shared_secret: String,
    pub railway_token: String,
    pub railway_project_id: String,
    pub railway_service_id: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };
        Ok(Config {
            upstream_base_url: lookup("WITHINGS_MCP_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            admin_token: var("ADMIN_API_TOKEN"),
            shared_secret: var("GUARDIAN_SECRET"),
            railway_token: var("RAILWAY_TOKEN"),
            railway_project_id: var("RAILWAY_PROJECT_ID"),
            railway_service_id: var("RAILWAY_SERVICE_ID"),
            port,
        })
    }

    pub fn from_values(
        upstream_base_url: impl Into<String>,
        admin_token: impl Into<String>,
        shared_secret: impl Into<String>,
    ) -> Self {
        Config {
            upstream_base_url: upstream_base_url.into(),
            admin_token: admin_token.into(),
            shared_secret: shared_secret.into(),
            railway_token: String::new(),
            railway_project_id: String::new(),
            railway_service_id: String::new(),
            port: DEFAULT_PORT,
        }
    }

    /// An empty shared secret means callers are not authenticated at all.
    pub fn secret_required(&self) -> bool {
        !self.shared_secret.is_empty()
    }
}
