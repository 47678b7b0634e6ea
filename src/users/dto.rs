use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub pass: String,
}

/// Response of the promotion batch job.
#[derive(Debug, Serialize)]
pub struct PromotionResponse {
    pub updated: u64,
}
