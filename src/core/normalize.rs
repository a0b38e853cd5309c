use crate::error::CoreError;
use crate::models::{AnswerValue, QuestionKind};

/// Lowest raw value on the agreement scale
pub const SCALE_MIN: u8 = 1;
/// Highest raw value on the agreement scale
pub const SCALE_MAX: u8 = 5;

/// Map a raw answer value into the common [0,1] similarity domain
///
/// * bool: true → 1.0, false → 0.0
/// * scale: (v - 1) / 4, monotonically increasing in v
///
/// Rejects a value whose variant does not match the question kind, and
/// scale values outside 1..=5. This runs before any aggregation so one
/// malformed input cannot silently distort a score.
#[inline]
pub fn normalize(value: AnswerValue, kind: QuestionKind) -> Result<f64, CoreError> {
    match (kind, value) {
        (QuestionKind::Bool, AnswerValue::Bool(v)) => Ok(if v { 1.0 } else { 0.0 }),
        (QuestionKind::Scale, AnswerValue::Scale(v)) => {
            if !(SCALE_MIN..=SCALE_MAX).contains(&v) {
                return Err(CoreError::Validation(format!(
                    "scale value {} outside {}..={}",
                    v, SCALE_MIN, SCALE_MAX
                )));
            }
            Ok(f64::from(v - SCALE_MIN) / f64::from(SCALE_MAX - SCALE_MIN))
        }
        (QuestionKind::Bool, AnswerValue::Scale(_)) => Err(CoreError::Validation(
            "scale value given for a bool question".to_string(),
        )),
        (QuestionKind::Scale, AnswerValue::Bool(_)) => Err(CoreError::Validation(
            "bool value given for a scale question".to_string(),
        )),
    }
}

/// Similarity of two normalized values, always in [0,1]
///
/// 1 = perfect agreement, 0 = maximal disagreement.
#[inline]
pub fn similarity(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs()
}

/// Check a self-reported importance value (1..=3)
#[inline]
pub fn validate_importance(importance: u8) -> Result<(), CoreError> {
    if (1..=3).contains(&importance) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "importance {} outside 1..=3",
            importance
        )))
    }
}
