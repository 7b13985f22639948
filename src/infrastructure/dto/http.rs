//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Process-local counters reported by `GET /api/stats`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsDto {
    /// Live connections
    pub connected: usize,
    /// Clients waiting for a partner
    pub waiting: usize,
    /// Active pairs
    pub pairs: usize,
    /// Server start time, RFC 3339
    pub started_at: String,
}
