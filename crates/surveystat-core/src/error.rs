//! Statistics error types.
//!
//! Defined in `surveystat-core` so that repositories, the HTTP surface, and
//! the CLI can downcast an `anyhow::Error` and classify it (404 vs 422 vs 500)
//! without string matching.

use thiserror::Error;

/// Errors raised around statistics computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The referenced survey could not be resolved.
    #[error("survey not found: {0}")]
    NotFound(String),

    /// A response's answers could not be interpreted.
    #[error("invalid response {response}{}: {message}", question_suffix(.question))]
    Validation {
        /// Response id, or `#n` (1-based position) when the record has no id.
        response: String,
        /// Offending question id, if the problem is local to one answer.
        question: Option<String>,
        message: String,
    },
}

fn question_suffix(question: &Option<String>) -> String {
    match question {
        Some(q) => format!(" (question {q})"),
        None => String::new(),
    }
}

impl StatsError {
    /// Build a validation error for a whole response record.
    pub fn invalid_response(response: impl Into<String>, message: impl Into<String>) -> Self {
        StatsError::Validation {
            response: response.into(),
            question: None,
            message: message.into(),
        }
    }

    /// Build a validation error for a single answer.
    pub fn invalid_answer(
        response: impl Into<String>,
        question: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StatsError::Validation {
            response: response.into(),
            question: Some(question.into()),
            message: message.into(),
        }
    }

    /// Returns `true` for a missing survey.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_response_and_question() {
        let err = StatsError::invalid_answer("r-7", "q2", "nested collections are not supported");
        assert_eq!(
            err.to_string(),
            "invalid response r-7 (question q2): nested collections are not supported"
        );
    }

    #[test]
    fn validation_message_without_question() {
        let err = StatsError::invalid_response("#3", "answers must be an object");
        assert_eq!(err.to_string(), "invalid response #3: answers must be an object");
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_classified() {
        let err = StatsError::NotFound("abc".into());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "survey not found: abc");
    }
}
