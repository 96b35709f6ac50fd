//! surveystat-core: survey data model, statistics aggregation, and reporting.
//!
//! This crate defines the survey and response model, the pure statistics
//! aggregator, and the repository seam that storage backends implement.

pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod service;
pub mod statistics;
pub mod traits;

pub use error::StatsError;
pub use model::{
    Answer, Question, QuestionType, ResponseRecord, Scalar, SurveyDefinition, SurveyStatus,
};
pub use statistics::{compute_statistics, compute_statistics_from_raw, StatisticsReport};
pub use traits::SurveyRepository;
