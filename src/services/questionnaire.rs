use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::config::Settings;
use crate::core::report::assemble_report;
use crate::core::scoring::{score_answers, ScoringParams};
use crate::core::normalize::{normalize, validate_importance};
use crate::error::CoreError;
use crate::models::{
    Answer, AnswerProgress, CompatibilityReport, CreatePairRequest, CreatePairResponse,
    JoinPairRequest, JoinPairResponse, PairStatus, Respondent, SubmitAnswersRequest,
    SubmitAnswersResponse,
};
use crate::services::cache::ReportCache;
use crate::services::registry::PairingRegistry;
use crate::services::store::{AnswerStore, PairStore, QuestionCatalog};

/// Facade over the pairing registry, answer store and scoring engine
///
/// This is the surface the outer layers (HTTP, jobs) call into. Each
/// method validates its input, talks to the collaborator stores and runs
/// the pure core; reports are memoized per pair and the cache entry is
/// dropped on every answer write for that pair.
pub struct QuestionnaireService<Q, P, A>
where
    Q: QuestionCatalog,
    P: PairStore,
    A: AnswerStore,
{
    catalog: Arc<Q>,
    pairs: Arc<P>,
    answers: Arc<A>,
    registry: PairingRegistry<P>,
    cache: ReportCache,
    params: ScoringParams,
}

impl<Q, P, A> QuestionnaireService<Q, P, A>
where
    Q: QuestionCatalog,
    P: PairStore,
    A: AnswerStore,
{
    pub fn new(catalog: Arc<Q>, pairs: Arc<P>, answers: Arc<A>, settings: &Settings) -> Self {
        let registry = PairingRegistry::new(Arc::clone(&pairs), settings.pairing.clone());
        let cache = ReportCache::new(&settings.cache);
        let params = settings.scoring.params();

        Self {
            catalog,
            pairs,
            answers,
            registry,
            cache,
            params,
        }
    }

    /// Open a new pair and hand back its shareable code
    pub fn create_pair(&self, request: CreatePairRequest) -> Result<CreatePairResponse, CoreError> {
        request
            .validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;

        let pair = self.registry.create(&request.creator_id)?;
        Ok(CreatePairResponse {
            pair_id: pair.id,
            code: pair.code,
            expires_at: pair.expires_at,
        })
    }

    /// Join an existing pair by code
    pub fn join_pair(&self, request: JoinPairRequest) -> Result<JoinPairResponse, CoreError> {
        request
            .validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;

        let pair = self.registry.join(&request.code, &request.partner_id)?;
        Ok(JoinPairResponse {
            pair_id: pair.id,
            status: pair.status,
        })
    }

    /// Where a user currently stands: creator role first, newest pair wins
    pub fn lookup_pair(&self, user_id: &str) -> Result<Option<crate::models::Pair>, CoreError> {
        self.registry.lookup(user_id)
    }

    /// Store one respondent's answer batch
    ///
    /// The whole batch is validated against the catalog before anything is
    /// written, so a malformed entry cannot leave a half-applied
    /// submission behind. Writes are upserts: resubmission overwrites.
    pub fn submit_answers(
        &self,
        request: SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, CoreError> {
        request
            .validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;

        let now = Utc::now();
        let pair = self
            .pairs
            .get(request.pair_id)?
            .ok_or_else(|| CoreError::NotFound(format!("pair {}", request.pair_id)))?;
        if pair.is_expired(now) {
            return Err(CoreError::NotFound(format!(
                "pair {} has expired",
                request.pair_id
            )));
        }

        let kinds: HashMap<String, _> = self
            .catalog
            .list_questions()
            .into_iter()
            .map(|question| (question.id, question.kind))
            .collect();

        // Reject the batch before aggregation or storage sees any of it
        for submission in &request.answers {
            let kind = kinds.get(&submission.question_id).ok_or_else(|| {
                CoreError::Validation(format!("unknown question id {}", submission.question_id))
            })?;
            normalize(submission.value, *kind)?;
            validate_importance(submission.importance)?;
        }

        let mut saved: HashSet<String> = HashSet::new();
        for submission in &request.answers {
            self.answers.upsert_answer(Answer {
                pair_id: request.pair_id,
                question_id: submission.question_id.clone(),
                respondent: request.respondent,
                value: submission.value,
                importance: submission.importance,
            })?;
            saved.insert(submission.question_id.clone());
        }

        // Any answer write drops the memoized report for this pair
        self.cache.invalidate(request.pair_id);

        tracing::info!(
            "Saved {} answers for pair {} respondent {}",
            saved.len(),
            request.pair_id,
            request.respondent
        );

        Ok(SubmitAnswersResponse {
            saved_count: saved.len(),
        })
    }

    /// Compute (or fetch the memoized) compatibility report for a pair
    ///
    /// Partial data degrades to null scores plus a non-zero
    /// `unscored_count`; only a pair with zero scoreable questions fails,
    /// with `DataIncomplete`. A fully answered catalog advances a joined
    /// pair to completed.
    pub fn get_report(&self, pair_id: Uuid) -> Result<CompatibilityReport, CoreError> {
        let pair = self
            .pairs
            .get(pair_id)?
            .ok_or_else(|| CoreError::NotFound(format!("pair {}", pair_id)))?;

        if let Some(cached) = self.cache.get(pair_id) {
            return Ok(cached);
        }

        let questions = self.catalog.list_questions();
        let answers = self.answers.get_answers(pair_id)?;
        let outcome = score_answers(&questions, &answers, &self.params)?;
        let report = assemble_report(pair_id, &questions, outcome);

        // Implicit completion: every question answered by both respondents
        if report.unscored_count == 0
            && pair.status == PairStatus::Joined
            && !pair.is_expired(Utc::now())
        {
            self.pairs.mark_completed(pair_id)?;
            tracing::info!("Pair {} completed", pair_id);
        }

        self.cache.set(report.clone());
        Ok(report)
    }

    /// Per-respondent progress through the catalog, no scoring involved
    pub fn answer_progress(&self, pair_id: Uuid) -> Result<AnswerProgress, CoreError> {
        self.pairs
            .get(pair_id)?
            .ok_or_else(|| CoreError::NotFound(format!("pair {}", pair_id)))?;

        let answers = self.answers.get_answers(pair_id)?;
        let answered_a = answers
            .iter()
            .filter(|a| a.respondent == Respondent::A)
            .count();
        let answered_b = answers.len() - answered_a;

        Ok(AnswerProgress {
            pair_id,
            answered_a,
            answered_b,
            total_questions: self.catalog.list_questions().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerSubmission;
    use crate::models::AnswerValue;
    use crate::services::store::{MemoryAnswerStore, MemoryPairStore, StaticCatalog};

    fn service() -> QuestionnaireService<StaticCatalog, MemoryPairStore, MemoryAnswerStore> {
        QuestionnaireService::new(
            Arc::new(StaticCatalog::sample()),
            Arc::new(MemoryPairStore::new()),
            Arc::new(MemoryAnswerStore::new()),
            &Settings::default(),
        )
    }

    fn submission(question_id: &str, value: AnswerValue) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.to_string(),
            value,
            importance: 1,
        }
    }

    #[test]
    fn test_submit_rejects_unknown_question_without_writes() {
        let service = service();
        let created = service
            .create_pair(CreatePairRequest {
                creator_id: "u1".to_string(),
            })
            .unwrap();

        let result = service.submit_answers(SubmitAnswersRequest {
            pair_id: created.pair_id,
            respondent: Respondent::A,
            answers: vec![
                submission("q-faith-1", AnswerValue::Bool(true)),
                submission("q-bogus", AnswerValue::Bool(true)),
            ],
        });

        assert!(matches!(result, Err(CoreError::Validation(_))));
        // Nothing from the bad batch was stored
        let progress = service.answer_progress(created.pair_id).unwrap();
        assert_eq!(progress.answered_a, 0);
    }

    #[test]
    fn test_submit_counts_unique_rows() {
        let service = service();
        let created = service
            .create_pair(CreatePairRequest {
                creator_id: "u1".to_string(),
            })
            .unwrap();

        // The same question twice in one batch upserts a single row
        let response = service
            .submit_answers(SubmitAnswersRequest {
                pair_id: created.pair_id,
                respondent: Respondent::A,
                answers: vec![
                    submission("q-life-1", AnswerValue::Scale(2)),
                    submission("q-life-1", AnswerValue::Scale(4)),
                ],
            })
            .unwrap();

        assert_eq!(response.saved_count, 1);
    }

    #[test]
    fn test_report_for_unknown_pair_not_found() {
        let service = service();
        assert!(matches!(
            service.get_report(Uuid::new_v4()),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_report_with_no_answers_is_data_incomplete() {
        let service = service();
        let created = service
            .create_pair(CreatePairRequest {
                creator_id: "u1".to_string(),
            })
            .unwrap();

        assert!(matches!(
            service.get_report(created.pair_id),
            Err(CoreError::DataIncomplete(_))
        ));
    }
}
