use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::PairStatus;

/// Response for pair creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePairResponse {
    #[serde(rename = "pairId")]
    pub pair_id: Uuid,
    pub code: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// Response for a successful join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPairResponse {
    #[serde(rename = "pairId")]
    pub pair_id: Uuid,
    pub status: PairStatus,
}

/// Response for an answer submission batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    #[serde(rename = "savedCount")]
    pub saved_count: usize,
}

/// Per-respondent answer progress for one pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerProgress {
    #[serde(rename = "pairId")]
    pub pair_id: Uuid,
    #[serde(rename = "answeredA")]
    pub answered_a: usize,
    #[serde(rename = "answeredB")]
    pub answered_b: usize,
    #[serde(rename = "totalQuestions")]
    pub total_questions: usize,
}
