//! Pairscore - pairing and compatibility scoring for the Pairscore couple questionnaire
//!
//! This library provides the core of the Pairscore questionnaire product:
//! the pairing lifecycle (shareable invite codes, join semantics, expiry)
//! and the deterministic compatibility scoring engine that turns two
//! respondents' answers into per-axis and overall scores.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::core::{assemble_report, score_answers, ScoringParams};
pub use crate::error::CoreError;
pub use crate::models::{
    Answer, AnswerValue, CompatibilityReport, Pair, PairStatus, Question, QuestionKind, Respondent,
};
pub use crate::services::{
    MemoryAnswerStore, MemoryPairStore, PairingRegistry, QuestionnaireService, ReportCache,
    StaticCatalog,
};
