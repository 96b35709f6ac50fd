//! In-memory repository for tests and embedding.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use surveystat_core::model::{ResponseRecord, SurveyDefinition};
use surveystat_core::parser::Dataset;
use surveystat_core::traits::{sort_newest_first, SurveyRepository};

/// A repository that keeps surveys and responses in memory.
///
/// Useful for exercising the reporting service and HTTP surface without a
/// real store.
#[derive(Default)]
pub struct InMemoryRepository {
    surveys: RwLock<Vec<SurveyDefinition>>,
    responses: RwLock<Vec<ResponseRecord>>,
    /// Number of queries served.
    query_count: AtomicU32,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding everything in a dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            surveys: RwLock::new(dataset.surveys),
            responses: RwLock::new(dataset.responses),
            query_count: AtomicU32::new(0),
        }
    }

    /// Add or replace a survey.
    pub fn insert_survey(&self, survey: SurveyDefinition) {
        let mut surveys = self.surveys.write().unwrap_or_else(|e| e.into_inner());
        surveys.retain(|s| s.id != survey.id);
        surveys.push(survey);
    }

    /// Record a response.
    pub fn insert_response(&self, response: ResponseRecord) {
        self.responses
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(response);
    }

    /// Get the number of queries made against this repository.
    pub fn query_count(&self) -> u32 {
        self.query_count.load(Ordering::Relaxed)
    }

    fn record_query(&self) {
        self.query_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl SurveyRepository for InMemoryRepository {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_survey_by_id(&self, id: &str) -> anyhow::Result<Option<SurveyDefinition>> {
        self.record_query();
        let surveys = self.surveys.read().unwrap_or_else(|e| e.into_inner());
        Ok(surveys.iter().find(|s| s.id == id).cloned())
    }

    async fn get_responses_for_survey(
        &self,
        survey_id: &str,
    ) -> anyhow::Result<Vec<ResponseRecord>> {
        self.record_query();
        let responses = self.responses.read().unwrap_or_else(|e| e.into_inner());
        Ok(responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .cloned()
            .collect())
    }

    async fn list_surveys(&self) -> anyhow::Result<Vec<SurveyDefinition>> {
        self.record_query();
        let mut surveys = self
            .surveys
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        sort_newest_first(&mut surveys);
        Ok(surveys)
    }
}
