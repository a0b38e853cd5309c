use std::collections::HashMap;

use crate::core::normalize::{normalize, similarity, validate_importance};
use crate::error::CoreError;
use crate::models::{Answer, Question, Respondent};

/// Tunable scoring parameters
#[derive(Debug, Clone, Copy)]
pub struct ScoringParams {
    /// A scored dealbreaker whose similarity falls below this threshold is
    /// flagged as a conflict. 0.75 flags a strict bool mismatch and any
    /// scale distance of two or more raw points, while a one-point scale
    /// gap (sim = 0.75) passes.
    pub dealbreaker_threshold: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            dealbreaker_threshold: 0.75,
        }
    }
}

/// Aggregate for one axis, in first-encounter catalog order
#[derive(Debug, Clone)]
pub struct AxisAggregate {
    pub axis: String,
    /// `None` when the axis had zero scored questions
    pub score: Option<u8>,
    /// Total effective weight of the axis's scored questions
    pub total_weight: f64,
}

/// Raw engine output, before the report assembler orders it
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub axes: Vec<AxisAggregate>,
    pub overall_score: Option<u8>,
    /// Flagged dealbreaker question ids, in catalog order
    pub dealbreaker_conflicts: Vec<String>,
    /// Catalog questions missing an answer from either respondent
    pub unscored_count: usize,
}

/// Round-half-up to an integer score in 0..=100
///
/// The one rounding rule used everywhere, so the same input always yields
/// the same report.
#[inline]
pub fn round_half_up(value: f64) -> u8 {
    (value + 0.5).floor() as u8
}

/// Score one pair's answers against the question catalog
///
/// A question contributes only when both respondents have answered it;
/// anything else is counted in `unscored_count` and excluded from every
/// aggregate (never treated as zero similarity). Pure function of
/// {catalog, answer set}: no hidden state, no nondeterministic
/// tie-breaking.
///
/// Fails with `Validation` on any malformed value or importance (checked
/// before aggregation) and with `DataIncomplete` only when zero questions
/// were scored across the entire catalog.
pub fn score_answers(
    catalog: &[Question],
    answers: &[Answer],
    params: &ScoringParams,
) -> Result<ScoreOutcome, CoreError> {
    // Upsert semantics on the lookup too: a duplicate row for the same
    // (question, respondent) key keeps the last value.
    let mut by_key: HashMap<(&str, Respondent), &Answer> = HashMap::new();
    for answer in answers {
        by_key.insert((answer.question_id.as_str(), answer.respondent), answer);
    }

    // Axes accumulate in first-encounter order to keep summation order,
    // and with it the emitted report, deterministic.
    let mut axes: Vec<(String, f64, f64)> = Vec::new(); // (axis, Σ sim·ew, Σ ew)
    let mut dealbreaker_conflicts = Vec::new();
    let mut unscored_count = 0usize;
    let mut scored_count = 0usize;

    for question in catalog {
        let a = by_key.get(&(question.id.as_str(), Respondent::A));
        let b = by_key.get(&(question.id.as_str(), Respondent::B));

        let axis_idx = match axes.iter().position(|(axis, _, _)| *axis == question.axis) {
            Some(idx) => idx,
            None => {
                axes.push((question.axis.clone(), 0.0, 0.0));
                axes.len() - 1
            }
        };

        let (answer_a, answer_b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                unscored_count += 1;
                continue;
            }
        };

        validate_importance(answer_a.importance)?;
        validate_importance(answer_b.importance)?;

        let norm_a = normalize(answer_a.value, question.kind)?;
        let norm_b = normalize(answer_b.value, question.kind)?;
        let sim = similarity(norm_a, norm_b);

        // Importance amplifies, never dampens: avg(1..=3, 1..=3) >= 1
        let avg_importance = f64::from(answer_a.importance + answer_b.importance) / 2.0;
        let effective_weight = question.weight * avg_importance;

        axes[axis_idx].1 += sim * effective_weight;
        axes[axis_idx].2 += effective_weight;
        scored_count += 1;

        if question.is_dealbreaker && sim < params.dealbreaker_threshold {
            dealbreaker_conflicts.push(question.id.clone());
        }
    }

    if scored_count == 0 {
        return Err(CoreError::DataIncomplete(
            "zero questions scored across the catalog".to_string(),
        ));
    }

    let axes: Vec<AxisAggregate> = axes
        .into_iter()
        .map(|(axis, weighted_sum, total_weight)| AxisAggregate {
            axis,
            score: (total_weight > 0.0).then(|| round_half_up(100.0 * weighted_sum / total_weight)),
            total_weight,
        })
        .collect();

    // Overall: axis scores averaged by each axis's total effective weight
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for axis in &axes {
        if let Some(score) = axis.score {
            weighted_sum += f64::from(score) * axis.total_weight;
            total_weight += axis.total_weight;
        }
    }
    let overall_score = (total_weight > 0.0).then(|| round_half_up(weighted_sum / total_weight));

    Ok(ScoreOutcome {
        axes,
        overall_score,
        dealbreaker_conflicts,
        unscored_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerValue, QuestionKind};
    use uuid::Uuid;

    fn question(id: &str, axis: &str, kind: QuestionKind, weight: f64, dealbreaker: bool) -> Question {
        Question {
            id: id.to_string(),
            axis: axis.to_string(),
            label: format!("Question {}", id),
            kind,
            weight,
            is_dealbreaker: dealbreaker,
            order_index: 0,
        }
    }

    fn answer(question_id: &str, respondent: Respondent, value: AnswerValue, importance: u8) -> Answer {
        Answer {
            pair_id: Uuid::nil(),
            question_id: question_id.to_string(),
            respondent,
            value,
            importance,
        }
    }

    #[test]
    fn test_religion_axis_example() {
        // Two bool dealbreakers, weight 3 each: A [true, true], B [true, false]
        let catalog = vec![
            question("q1", "Religion", QuestionKind::Bool, 3.0, true),
            question("q2", "Religion", QuestionKind::Bool, 3.0, true),
        ];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q2", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q1", Respondent::B, AnswerValue::Bool(true), 1),
            answer("q2", Respondent::B, AnswerValue::Bool(false), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();

        // sims [1, 0] → round(100 × (3 + 0) / 6) = 50
        assert_eq!(outcome.axes[0].score, Some(50));
        assert_eq!(outcome.overall_score, Some(50));
        assert_eq!(outcome.dealbreaker_conflicts, vec!["q2".to_string()]);
        assert_eq!(outcome.unscored_count, 0);
    }

    #[test]
    fn test_unscored_questions_excluded_from_aggregates() {
        let catalog = vec![
            question("q1", "Family", QuestionKind::Scale, 2.0, false),
            question("q2", "Family", QuestionKind::Scale, 2.0, false),
        ];
        // q2 only answered by A: it must not drag the axis toward zero
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Scale(4), 1),
            answer("q1", Respondent::B, AnswerValue::Scale(4), 1),
            answer("q2", Respondent::A, AnswerValue::Scale(1), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();

        assert_eq!(outcome.axes[0].score, Some(100));
        assert_eq!(outcome.unscored_count, 1);
    }

    #[test]
    fn test_axis_without_scored_questions_is_null() {
        let catalog = vec![
            question("q1", "Family", QuestionKind::Bool, 1.0, false),
            question("q2", "Finances", QuestionKind::Bool, 1.0, false),
        ];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q1", Respondent::B, AnswerValue::Bool(true), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();

        let finances = outcome.axes.iter().find(|a| a.axis == "Finances").unwrap();
        assert_eq!(finances.score, None);
        // Null axes carry no weight in the overall score
        assert_eq!(outcome.overall_score, Some(100));
    }

    #[test]
    fn test_importance_amplifies_contribution() {
        let catalog = vec![
            question("q1", "Lifestyle", QuestionKind::Bool, 1.0, false),
            question("q2", "Lifestyle", QuestionKind::Bool, 1.0, false),
        ];
        // Disagreement on q1 with max importance outweighs agreement on q2:
        // ew(q1) = 3, ew(q2) = 1 → round(100 × 1 / 4) = 25
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Bool(true), 3),
            answer("q1", Respondent::B, AnswerValue::Bool(false), 3),
            answer("q2", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q2", Respondent::B, AnswerValue::Bool(true), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();
        assert_eq!(outcome.axes[0].score, Some(25));
    }

    #[test]
    fn test_dealbreaker_scale_threshold() {
        let catalog = vec![
            question("q1", "Values", QuestionKind::Scale, 1.0, true),
            question("q2", "Values", QuestionKind::Scale, 1.0, true),
        ];
        // One raw point apart (sim 0.75): not a conflict.
        // Two raw points apart (sim 0.5): flagged.
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Scale(3), 1),
            answer("q1", Respondent::B, AnswerValue::Scale(4), 1),
            answer("q2", Respondent::A, AnswerValue::Scale(1), 1),
            answer("q2", Respondent::B, AnswerValue::Scale(3), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();
        assert_eq!(outcome.dealbreaker_conflicts, vec!["q2".to_string()]);
    }

    #[test]
    fn test_dealbreaker_flag_leaves_axis_score_alone() {
        let catalog = vec![question("q1", "Values", QuestionKind::Bool, 2.0, true)];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q1", Respondent::B, AnswerValue::Bool(false), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();

        // The conflict is a parallel signal; the numeric score is untouched
        assert_eq!(outcome.dealbreaker_conflicts.len(), 1);
        assert_eq!(outcome.axes[0].score, Some(0));
    }

    #[test]
    fn test_relabeling_respondents_is_symmetric() {
        let catalog = vec![
            question("q1", "Family", QuestionKind::Scale, 2.0, false),
            question("q2", "Values", QuestionKind::Bool, 1.5, true),
        ];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Scale(2), 2),
            answer("q1", Respondent::B, AnswerValue::Scale(5), 1),
            answer("q2", Respondent::A, AnswerValue::Bool(false), 3),
            answer("q2", Respondent::B, AnswerValue::Bool(true), 1),
        ];
        let swapped: Vec<Answer> = answers
            .iter()
            .map(|a| Answer {
                respondent: a.respondent.other(),
                ..a.clone()
            })
            .collect();

        let forward = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();
        let reverse = score_answers(&catalog, &swapped, &ScoringParams::default()).unwrap();

        assert_eq!(forward.overall_score, reverse.overall_score);
        for (f, r) in forward.axes.iter().zip(reverse.axes.iter()) {
            assert_eq!(f.axis, r.axis);
            assert_eq!(f.score, r.score);
        }
    }

    #[test]
    fn test_zero_scored_questions_is_data_incomplete() {
        let catalog = vec![question("q1", "Family", QuestionKind::Bool, 1.0, false)];
        let answers = vec![answer("q1", Respondent::A, AnswerValue::Bool(true), 1)];

        let result = score_answers(&catalog, &answers, &ScoringParams::default());
        assert!(matches!(result, Err(CoreError::DataIncomplete(_))));
    }

    #[test]
    fn test_malformed_value_rejected_before_aggregation() {
        let catalog = vec![question("q1", "Family", QuestionKind::Scale, 1.0, false)];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Scale(9), 1),
            answer("q1", Respondent::B, AnswerValue::Scale(3), 1),
        ];

        let result = score_answers(&catalog, &answers, &ScoringParams::default());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_duplicate_answer_rows_keep_last_value() {
        let catalog = vec![question("q1", "Family", QuestionKind::Bool, 1.0, false)];
        let answers = vec![
            answer("q1", Respondent::A, AnswerValue::Bool(false), 1),
            answer("q1", Respondent::A, AnswerValue::Bool(true), 1),
            answer("q1", Respondent::B, AnswerValue::Bool(true), 1),
        ];

        let outcome = score_answers(&catalog, &answers, &ScoringParams::default()).unwrap();
        assert_eq!(outcome.axes[0].score, Some(100));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(49.5), 50);
        assert_eq!(round_half_up(49.4), 49);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(100.0), 100);
    }
}
