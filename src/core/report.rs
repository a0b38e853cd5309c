use std::collections::HashMap;

use uuid::Uuid;

use crate::core::scoring::ScoreOutcome;
use crate::models::{AxisScore, CompatibilityReport, Question};

/// Arrange engine output into the presentation-ready report
///
/// Axis scores are ordered by each axis's first `order_index` occurrence
/// in the catalog, not by map iteration order. `unscored_count` and
/// `dealbreaker_conflicts` pass through unchanged; no further computation
/// happens here.
pub fn assemble_report(
    pair_id: Uuid,
    catalog: &[Question],
    outcome: ScoreOutcome,
) -> CompatibilityReport {
    let mut first_occurrence: HashMap<&str, u32> = HashMap::new();
    for question in catalog {
        first_occurrence
            .entry(question.axis.as_str())
            .or_insert(question.order_index);
    }

    let mut axis_scores: Vec<AxisScore> = outcome
        .axes
        .into_iter()
        .map(|aggregate| AxisScore {
            axis: aggregate.axis,
            score: aggregate.score,
        })
        .collect();
    axis_scores.sort_by_key(|entry| {
        first_occurrence
            .get(entry.axis.as_str())
            .copied()
            .unwrap_or(u32::MAX)
    });

    CompatibilityReport {
        pair_id,
        axis_scores,
        overall_score: outcome.overall_score,
        dealbreaker_conflicts: outcome.dealbreaker_conflicts,
        unscored_count: outcome.unscored_count,
    }
}
