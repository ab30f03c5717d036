use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgment returned by every write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteAck {
    pub success: bool,
}

impl WriteAck {
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Name of the document store backend in use
    pub store: String,
}
