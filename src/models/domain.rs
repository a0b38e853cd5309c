use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of answer a question accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Bool,
    Scale,
}

/// A single catalog question
///
/// The catalog is read-only and ordered by `order_index`; `weight` must be
/// positive (enforced when the catalog is loaded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub axis: String,
    pub label: String,
    pub kind: QuestionKind,
    pub weight: f64,
    #[serde(rename = "isDealbreaker", default)]
    pub is_dealbreaker: bool,
    #[serde(rename = "orderIndex")]
    pub order_index: u32,
}

/// A raw answer value, tagged so normalization can match each variant
/// exhaustively and reject anything else at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AnswerValue {
    Bool(bool),
    /// Integer 1..=5, validated before any aggregation
    Scale(u8),
}

/// Which side of the pair a respondent is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Respondent {
    A,
    B,
}

impl Respondent {
    pub fn other(&self) -> Respondent {
        match self {
            Respondent::A => Respondent::B,
            Respondent::B => Respondent::A,
        }
    }
}

impl std::fmt::Display for Respondent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Respondent::A => write!(f, "A"),
            Respondent::B => write!(f, "B"),
        }
    }
}

/// One respondent's current answer to one question
///
/// Exactly one row exists per (pair, question, respondent); resubmission
/// overwrites the prior value, never appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "pairId")]
    pub pair_id: Uuid,
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub respondent: Respondent,
    #[serde(flatten)]
    pub value: AnswerValue,
    /// Self-reported emphasis, 1..=3
    #[serde(default = "default_importance")]
    pub importance: u8,
}

pub(crate) fn default_importance() -> u8 {
    1
}

/// Pair lifecycle status
///
/// Stored pairs only ever hold `Pending`, `Joined` or `Completed`;
/// `Expired` is an effective status derived at read time from `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    Pending,
    Joined,
    Completed,
    Expired,
}

/// A two-party relationship established via a shareable code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub id: Uuid,
    pub code: String,
    #[serde(rename = "creatorId")]
    pub creator_id: String,
    #[serde(rename = "partnerId")]
    pub partner_id: Option<String>,
    pub status: PairStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "partnerJoinedAt")]
    pub partner_joined_at: Option<DateTime<Utc>>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Pair {
    /// True once `now` has passed `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Status as seen by readers: expiry overrides the stored field
    /// without mutating the pair in place
    pub fn effective_status(&self, now: DateTime<Utc>) -> PairStatus {
        if self.is_expired(now) {
            PairStatus::Expired
        } else {
            self.status
        }
    }
}

/// Score for one axis, `None` when the axis had zero scored questions
/// ("no data", distinct from a numeric 0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisScore {
    pub axis: String,
    pub score: Option<u8>,
}

/// The finished compatibility report for one pair
///
/// Derived data: recomputable at any time from the current answer set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    #[serde(rename = "pairId")]
    pub pair_id: Uuid,
    /// Ordered by each axis's first `order_index` occurrence in the catalog
    #[serde(rename = "axisScores")]
    pub axis_scores: Vec<AxisScore>,
    #[serde(rename = "overallScore")]
    pub overall_score: Option<u8>,
    /// Question ids, in catalog order
    #[serde(rename = "dealbreakerConflicts")]
    pub dealbreaker_conflicts: Vec<String>,
    #[serde(rename = "unscoredCount")]
    pub unscored_count: usize,
}

impl CompatibilityReport {
    /// Look up one axis score by label
    pub fn axis(&self, axis: &str) -> Option<&AxisScore> {
        self.axis_scores.iter().find(|a| a.axis == axis)
    }
}
