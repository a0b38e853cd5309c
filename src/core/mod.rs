// Core algorithm exports
pub mod codes;
pub mod normalize;
pub mod report;
pub mod scoring;

pub use codes::{generate_code, length_for_attempt, DEFAULT_ALPHABET};
pub use normalize::{normalize, similarity, validate_importance};
pub use report::assemble_report;
pub use scoring::{round_half_up, score_answers, AxisAggregate, ScoreOutcome, ScoringParams};
