//! Repository trait implemented by survey storage backends.
//!
//! The aggregator never touches storage; everything it consumes comes through
//! this seam. Implementations live in the `surveystat-store` crate.

use async_trait::async_trait;

use crate::model::{ResponseRecord, SurveyDefinition, SurveyStatus};

/// Read access to surveys and their collected responses.
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Human-readable backend name (e.g. "json").
    fn name(&self) -> &str;

    /// Resolve a survey by id. `Ok(None)` when it does not exist.
    async fn get_survey_by_id(&self, id: &str) -> anyhow::Result<Option<SurveyDefinition>>;

    /// Every response collected for a survey. Empty when there are none.
    async fn get_responses_for_survey(
        &self,
        survey_id: &str,
    ) -> anyhow::Result<Vec<ResponseRecord>>;

    /// All surveys, newest first.
    async fn list_surveys(&self) -> anyhow::Result<Vec<SurveyDefinition>>;

    /// Surveys in the given status, newest first.
    async fn surveys_by_status(
        &self,
        status: SurveyStatus,
    ) -> anyhow::Result<Vec<SurveyDefinition>> {
        let mut surveys = self.list_surveys().await?;
        surveys.retain(|s| s.status == status);
        Ok(surveys)
    }
}

/// Order surveys newest first. Surveys without a creation time sort last,
/// ties broken by id so the order is stable.
pub fn sort_newest_first(surveys: &mut [SurveyDefinition]) {
    surveys.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
