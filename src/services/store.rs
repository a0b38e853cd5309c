use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Answer, Pair, PairStatus, Question, QuestionKind, Respondent};

/// Read-only question catalog provider
pub trait QuestionCatalog: Send + Sync {
    /// Questions in presentation order
    fn list_questions(&self) -> Vec<Question>;
}

/// Storage contract for answers
///
/// The store guarantees exactly one current row per
/// (pair, question, respondent) key; an upsert replaces the prior value
/// atomically, last write wins on that single row.
pub trait AnswerStore: Send + Sync {
    fn get_answers(&self, pair_id: Uuid) -> Result<Vec<Answer>, CoreError>;
    fn upsert_answer(&self, answer: Answer) -> Result<(), CoreError>;
}

/// Storage contract for pairs
///
/// `try_set_partner` is the atomic compare-and-set primitive the join flow
/// relies on: the update commits only if it observes `partner_id` still
/// null, so of two concurrent joins exactly one succeeds.
pub trait PairStore: Send + Sync {
    /// Persist a new pair. Fails with `Conflict` if another non-expired
    /// pair already holds the same code (checked atomically with the
    /// insert, so concurrent creates cannot both claim a code).
    fn insert(&self, pair: Pair, now: DateTime<Utc>) -> Result<(), CoreError>;

    fn get(&self, pair_id: Uuid) -> Result<Option<Pair>, CoreError>;

    fn get_by_code(&self, code: &str) -> Result<Option<Pair>, CoreError>;

    /// All pairs in which the user appears as creator or partner
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Pair>, CoreError>;

    /// Atomic null → value transition on `partner_id`; also stamps
    /// `partner_joined_at` and advances `pending → joined`
    fn try_set_partner(
        &self,
        pair_id: Uuid,
        partner_id: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<Pair, CoreError>;

    /// Forward-only `joined → completed` advance; idempotent once completed
    fn mark_completed(&self, pair_id: Uuid) -> Result<(), CoreError>;
}

/// Config-driven, validated question catalog
///
/// Validation happens once at load: positive weights, unique ids.
pub struct StaticCatalog {
    questions: Vec<Question>,
}

impl StaticCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CoreError> {
        let mut seen = std::collections::HashSet::new();
        for question in &questions {
            if question.weight <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "question {} has non-positive weight {}",
                    question.id, question.weight
                )));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
        }
        Ok(Self { questions })
    }

    /// Small built-in catalog used by benches and demos
    pub fn sample() -> Self {
        let questions = vec![
            ("q-faith-1", "Religion", "Daily prayer matters to me", QuestionKind::Bool, 3.0, true),
            ("q-faith-2", "Religion", "I want a religious wedding", QuestionKind::Bool, 3.0, true),
            ("q-family-1", "Family", "I want children", QuestionKind::Bool, 3.0, true),
            ("q-family-2", "Family", "Extended family should live nearby", QuestionKind::Scale, 2.0, false),
            ("q-life-1", "Lifestyle", "I prefer a quiet evening at home", QuestionKind::Scale, 1.0, false),
            ("q-life-2", "Lifestyle", "Shared finances from day one", QuestionKind::Scale, 2.0, false),
            ("q-goals-1", "Ambitions", "Career comes before relocation comfort", QuestionKind::Scale, 1.5, false),
        ];

        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(idx, (id, axis, label, kind, weight, dealbreaker))| Question {
                id: id.to_string(),
                axis: axis.to_string(),
                label: label.to_string(),
                kind,
                weight,
                is_dealbreaker: dealbreaker,
                order_index: idx as u32,
            })
            .collect();

        // Literal catalog above is valid by construction
        Self { questions }
    }
}

impl QuestionCatalog for StaticCatalog {
    fn list_questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}

/// In-memory answer store keyed by (pair, question, respondent)
#[derive(Default)]
pub struct MemoryAnswerStore {
    rows: RwLock<HashMap<(Uuid, String, Respondent), Answer>>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn get_answers(&self, pair_id: Uuid) -> Result<Vec<Answer>, CoreError> {
        let rows = self.rows.read().expect("answer store lock poisoned");
        let mut answers: Vec<Answer> = rows
            .values()
            .filter(|answer| answer.pair_id == pair_id)
            .cloned()
            .collect();
        // Stable order for callers that display or diff answer sets
        answers.sort_by(|a, b| {
            a.question_id
                .cmp(&b.question_id)
                .then_with(|| respondent_rank(a.respondent).cmp(&respondent_rank(b.respondent)))
        });
        Ok(answers)
    }

    fn upsert_answer(&self, answer: Answer) -> Result<(), CoreError> {
        let key = (answer.pair_id, answer.question_id.clone(), answer.respondent);
        let mut rows = self.rows.write().expect("answer store lock poisoned");
        rows.insert(key, answer);
        Ok(())
    }
}

fn respondent_rank(respondent: Respondent) -> u8 {
    match respondent {
        Respondent::A => 0,
        Respondent::B => 1,
    }
}

/// In-memory pair store
///
/// One mutex guards the whole map so code-uniqueness checks and the
/// partner compare-and-set are atomic with their writes.
#[derive(Default)]
pub struct MemoryPairStore {
    pairs: Mutex<HashMap<Uuid, Pair>>,
}

impl MemoryPairStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PairStore for MemoryPairStore {
    fn insert(&self, pair: Pair, now: DateTime<Utc>) -> Result<(), CoreError> {
        let mut pairs = self.pairs.lock().expect("pair store lock poisoned");
        let code_taken = pairs
            .values()
            .any(|existing| existing.code == pair.code && !existing.is_expired(now));
        if code_taken {
            return Err(CoreError::Conflict(format!(
                "code {} already held by an active pair",
                pair.code
            )));
        }
        if pairs.contains_key(&pair.id) {
            return Err(CoreError::Conflict(format!("pair {} already exists", pair.id)));
        }
        pairs.insert(pair.id, pair);
        Ok(())
    }

    fn get(&self, pair_id: Uuid) -> Result<Option<Pair>, CoreError> {
        let pairs = self.pairs.lock().expect("pair store lock poisoned");
        Ok(pairs.get(&pair_id).cloned())
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Pair>, CoreError> {
        let pairs = self.pairs.lock().expect("pair store lock poisoned");
        Ok(pairs.values().find(|pair| pair.code == code).cloned())
    }

    fn find_by_user(&self, user_id: &str) -> Result<Vec<Pair>, CoreError> {
        let pairs = self.pairs.lock().expect("pair store lock poisoned");
        Ok(pairs
            .values()
            .filter(|pair| {
                pair.creator_id == user_id || pair.partner_id.as_deref() == Some(user_id)
            })
            .cloned()
            .collect())
    }

    fn try_set_partner(
        &self,
        pair_id: Uuid,
        partner_id: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<Pair, CoreError> {
        let mut pairs = self.pairs.lock().expect("pair store lock poisoned");
        let pair = pairs
            .get_mut(&pair_id)
            .ok_or_else(|| CoreError::NotFound(format!("pair {}", pair_id)))?;

        // The compare half of the CAS: commit only against a null partner
        if pair.partner_id.is_some() {
            return Err(CoreError::Conflict(
                "pair already has a partner".to_string(),
            ));
        }

        pair.partner_id = Some(partner_id.to_string());
        pair.partner_joined_at = Some(joined_at);
        pair.status = PairStatus::Joined;
        Ok(pair.clone())
    }

    fn mark_completed(&self, pair_id: Uuid) -> Result<(), CoreError> {
        let mut pairs = self.pairs.lock().expect("pair store lock poisoned");
        let pair = pairs
            .get_mut(&pair_id)
            .ok_or_else(|| CoreError::NotFound(format!("pair {}", pair_id)))?;

        match pair.status {
            PairStatus::Joined => {
                pair.status = PairStatus::Completed;
                Ok(())
            }
            PairStatus::Completed => Ok(()),
            _ => Err(CoreError::Conflict(format!(
                "pair {} cannot complete from {:?}",
                pair_id, pair.status
            ))),
        }
    }
}
