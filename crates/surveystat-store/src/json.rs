//! JSON dataset repository.
//!
//! Reads a dataset file or directory (see `surveystat_core::parser`) on every
//! query, so edits on disk are picked up without a restart.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use surveystat_core::model::{ResponseRecord, SurveyDefinition};
use surveystat_core::parser::{load_dataset, Dataset};
use surveystat_core::traits::{sort_newest_first, SurveyRepository};

/// Repository backed by a JSON dataset on disk.
pub struct JsonRepository {
    path: PathBuf,
}

impl JsonRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The dataset file or directory this repository reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> anyhow::Result<Dataset> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_dataset(&path))
            .await
            .context("dataset loader task failed")?
    }
}

#[async_trait]
impl SurveyRepository for JsonRepository {
    fn name(&self) -> &str {
        "json"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get_survey_by_id(&self, id: &str) -> anyhow::Result<Option<SurveyDefinition>> {
        let dataset = self.load().await?;
        Ok(dataset.surveys.into_iter().find(|s| s.id == id))
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get_responses_for_survey(
        &self,
        survey_id: &str,
    ) -> anyhow::Result<Vec<ResponseRecord>> {
        let dataset = self.load().await?;
        Ok(dataset
            .responses
            .into_iter()
            .filter(|r| r.survey_id == survey_id)
            .collect())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list_surveys(&self) -> anyhow::Result<Vec<SurveyDefinition>> {
        let mut surveys = self.load().await?.surveys;
        sort_newest_first(&mut surveys);
        Ok(surveys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveystat_core::model::SurveyStatus;
    use surveystat_core::StatsError;

    const DATASET: &str = r#"{
  "surveys": [
    {"id": "old", "title": "Old", "status": "closed", "createdAt": "2024-01-01T00:00:00Z"},
    {"id": "new", "title": "New", "createdAt": "2025-01-01T00:00:00Z",
     "questions": [{"id": "q", "title": "Q", "type": "free-text"}]}
  ],
  "responses": [
    {"surveyId": "new", "answers": {"q": "hi"}},
    {"surveyId": "new", "answers": {"q": "hello"}},
    {"surveyId": "old", "answers": {}}
  ]
}"#;

    fn write_dataset(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("data.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonRepository::new(write_dataset(dir.path(), DATASET));

        assert!(repo.get_survey_by_id("new").await.unwrap().is_some());
        assert_eq!(repo.get_responses_for_survey("new").await.unwrap().len(), 2);

        let ids: Vec<String> = repo
            .list_surveys()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);

        let closed = repo.surveys_by_status(SurveyStatus::Closed).await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, "old");
    }

    #[tokio::test]
    async fn picks_up_changes_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), r#"{"surveys": []}"#);
        let repo = JsonRepository::new(&path);
        assert!(repo.list_surveys().await.unwrap().is_empty());

        write_dataset(dir.path(), DATASET);
        assert_eq!(repo.list_surveys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_response_surfaces_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonRepository::new(write_dataset(
            dir.path(),
            r#"{"surveys": [], "responses": [{"surveyId": "s", "answers": [1, 2]}]}"#,
        ));

        let err = repo.get_responses_for_survey("s").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StatsError>(),
            Some(StatsError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn missing_path_fails() {
        let repo = JsonRepository::new("/definitely/not/here.json");
        assert!(repo.list_surveys().await.is_err());
    }
}
