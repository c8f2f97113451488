//! # token-guardian
//!
//! Webhook relay that asks the Withings MCP service to refresh its OAuth
//! token. The MCP service calls `POST /webhook/refresh-needed` when it starts
//! seeing 401s; the guardian then calls `POST {WITHINGS_MCP_URL}/admin/token/refresh`
//! once and reports the outcome.
//!
//! | Route | Auth header |
//! |---|---|
//! | `GET /` | none |
//! | `GET /health` | none |
//! | `POST /webhook/refresh-needed` | `X-Guardian-Secret` |
//! | `POST /refresh` | `X-Admin-Token` (compared with `GUARDIAN_SECRET`) |

mod config;
mod errors;
mod relay;
mod server;
mod signal;
mod telemetry;
mod types;

pub use config::{Config, DEFAULT_PORT, DEFAULT_UPSTREAM_URL};
pub use errors::{Error, RefreshError};
pub use relay::{RefreshRelay, UPSTREAM_TIMEOUT};
pub use server::{AppState, SERVICE_NAME, router, serve};
pub use telemetry::refresh::{RefreshTelemetry, RefreshTrigger};
pub use types::{RefreshResult, RefreshedToken};
