use serde::Serialize;
use utoipa::ToSchema;

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Either "ok" or "degraded".
    pub status: String,
}

impl HealthResponse {
    /// Storage is reachable and the show can run normally.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Storage is down; the board keeps running from memory only.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
        }
    }
}
