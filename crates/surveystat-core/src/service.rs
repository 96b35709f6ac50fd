//! Reporting service: resolve a survey and its responses, then aggregate.

use anyhow::Result;
use tracing::instrument;

use crate::error::StatsError;
use crate::model::SurveyDefinition;
use crate::report::StatisticsSnapshot;
use crate::statistics::{compute_statistics, StatisticsReport};
use crate::traits::SurveyRepository;

/// Compute statistics for a stored survey.
///
/// Fails with [`StatsError::NotFound`] (downcastable from the returned
/// `anyhow::Error`) when the repository has no such survey.
#[instrument(skip(repository), fields(backend = repository.name()))]
pub async fn survey_statistics(
    repository: &dyn SurveyRepository,
    survey_id: &str,
) -> Result<StatisticsReport> {
    let (_, report) = resolve_and_compute(repository, survey_id).await?;
    Ok(report)
}

/// Like [`survey_statistics`], wrapped in a timestamped snapshot.
#[instrument(skip(repository), fields(backend = repository.name()))]
pub async fn survey_snapshot(
    repository: &dyn SurveyRepository,
    survey_id: &str,
) -> Result<StatisticsSnapshot> {
    let (survey, report) = resolve_and_compute(repository, survey_id).await?;
    Ok(StatisticsSnapshot::new(&survey, report))
}

async fn resolve_and_compute(
    repository: &dyn SurveyRepository,
    survey_id: &str,
) -> Result<(SurveyDefinition, StatisticsReport)> {
    let Some(survey) = repository.get_survey_by_id(survey_id).await? else {
        tracing::info!(survey = survey_id, "survey not found");
        return Err(StatsError::NotFound(survey_id.to_string()).into());
    };

    let responses = repository.get_responses_for_survey(&survey.id).await?;
    tracing::info!(
        survey = %survey.id,
        responses = responses.len(),
        "computing statistics"
    );

    let report = compute_statistics(&survey, &responses);
    Ok((survey, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionType, ResponseRecord, SurveyStatus};
    use async_trait::async_trait;

    struct FixedRepository {
        survey: SurveyDefinition,
        responses: Vec<ResponseRecord>,
    }

    #[async_trait]
    impl SurveyRepository for FixedRepository {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn get_survey_by_id(&self, id: &str) -> Result<Option<SurveyDefinition>> {
            Ok((id == self.survey.id).then(|| self.survey.clone()))
        }

        async fn get_responses_for_survey(&self, survey_id: &str) -> Result<Vec<ResponseRecord>> {
            Ok(self
                .responses
                .iter()
                .filter(|r| r.survey_id == survey_id)
                .cloned()
                .collect())
        }

        async fn list_surveys(&self) -> Result<Vec<SurveyDefinition>> {
            Ok(vec![self.survey.clone()])
        }
    }

    fn repository() -> FixedRepository {
        FixedRepository {
            survey: SurveyDefinition::new("s1", "Lunch")
                .with_question(Question::new("q1", "Pizza?", QuestionType::YesNo).required(true)),
            responses: vec![
                ResponseRecord::new("s1")
                    .with_answer("q1", true)
                    .with_completion_time(9.0),
                ResponseRecord::new("s1").with_answer("q1", false),
                ResponseRecord::new("s2").with_answer("q1", true),
            ],
        }
    }

    #[tokio::test]
    async fn computes_for_existing_survey() {
        let repo = repository();
        let report = survey_statistics(&repo, "s1").await.unwrap();
        assert_eq!(report.total_responses, 2);
        assert_eq!(report.average_completion_time, 9.0);
        assert_eq!(report.completion_rate, 100.0);
        let answers: Vec<&str> = report.question_stats[0]
            .responses
            .iter()
            .map(|f| f.answer.as_str())
            .collect();
        assert_eq!(answers, vec!["true", "false"]);
    }

    #[tokio::test]
    async fn missing_survey_is_not_found() {
        let repo = repository();
        let err = survey_statistics(&repo, "nope").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<StatsError>(),
            Some(&StatsError::NotFound("nope".into()))
        );
    }

    #[tokio::test]
    async fn snapshot_carries_survey_summary() {
        let repo = repository();
        let snapshot = survey_snapshot(&repo, "s1").await.unwrap();
        assert_eq!(snapshot.survey.title, "Lunch");
        assert_eq!(snapshot.statistics.total_responses, 2);
    }

    #[tokio::test]
    async fn status_filter_defaults_to_list() {
        let repo = repository();
        let active = repo.surveys_by_status(SurveyStatus::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        let closed = repo.surveys_by_status(SurveyStatus::Closed).await.unwrap();
        assert!(closed.is_empty());
    }
}
