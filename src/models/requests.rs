use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{default_importance, AnswerValue, Respondent};

/// Request to open a new pair and obtain its shareable code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePairRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "creator_id", rename = "creatorId")]
    pub creator_id: String,
}

/// Request to join an existing pair via its code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinPairRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    #[serde(alias = "partner_id", rename = "partnerId")]
    pub partner_id: String,
}

/// One answer within a submission batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerSubmission {
    #[validate(length(min = 1))]
    #[serde(alias = "question_id", rename = "questionId")]
    pub question_id: String,
    #[serde(flatten)]
    pub value: AnswerValue,
    #[validate(range(min = 1, max = 3))]
    #[serde(default = "default_importance")]
    pub importance: u8,
}

/// Request to submit (or resubmit) a batch of answers for one respondent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[serde(alias = "pair_id", rename = "pairId")]
    pub pair_id: Uuid,
    pub respondent: Respondent,
    #[validate(nested)]
    pub answers: Vec<AnswerSubmission>,
}
