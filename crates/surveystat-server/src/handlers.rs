//! Route handlers.

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use surveystat_core::report::SurveySummary;
use surveystat_core::service;
use surveystat_core::statistics::StatisticsReport;
use surveystat_core::traits::SurveyRepository;
use surveystat_core::SurveyStatus;

use crate::error::ApiError;

type Repository = Extension<Arc<dyn SurveyRepository>>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: String,
}

/// GET /health
pub async fn health(Extension(repository): Repository) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: repository.name().to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by lifecycle status: draft, active, or closed.
    pub status: Option<String>,
}

/// GET /surveys, newest first, optionally filtered by status.
pub async fn list_surveys(
    Extension(repository): Repository,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SurveySummary>>, ApiError> {
    let surveys = match query.status.as_deref() {
        Some(raw) => {
            let status: SurveyStatus = raw.parse().map_err(ApiError::BadRequest)?;
            repository.surveys_by_status(status).await?
        }
        None => repository.list_surveys().await?,
    };
    Ok(Json(surveys.iter().map(SurveySummary::from).collect()))
}

/// GET /surveys/:id/statistics
pub async fn survey_statistics(
    Extension(repository): Repository,
    Path(id): Path<String>,
) -> Result<Json<StatisticsReport>, ApiError> {
    let report = service::survey_statistics(repository.as_ref(), &id).await?;
    Ok(Json(report))
}
