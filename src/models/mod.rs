// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Answer, AnswerValue, AxisScore, CompatibilityReport, Pair, PairStatus, Question, QuestionKind,
    Respondent,
};
pub use requests::{AnswerSubmission, CreatePairRequest, JoinPairRequest, SubmitAnswersRequest};
pub use responses::{AnswerProgress, CreatePairResponse, JoinPairResponse, SubmitAnswersResponse};
