// Service exports
pub mod cache;
pub mod questionnaire;
pub mod registry;
pub mod store;

pub use cache::ReportCache;
pub use questionnaire::QuestionnaireService;
pub use registry::PairingRegistry;
pub use store::{
    AnswerStore, MemoryAnswerStore, MemoryPairStore, PairStore, QuestionCatalog, StaticCatalog,
};
