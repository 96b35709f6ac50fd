//! Mapping of service errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use surveystat_core::StatsError;

/// Error returned by handlers. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself was malformed.
    BadRequest(String),
    /// Anything raised by the repository or the reporting service.
    Service(anyhow::Error),
}

impl ApiError {
    /// Status code for this error.
    ///
    /// Service errors are classified by downcasting to [`StatsError`]:
    /// missing surveys are 404, uninterpretable responses are 422, and
    /// everything else (store outages, bad configuration) is 500.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err.downcast_ref::<StatsError>() {
                Some(StatsError::NotFound(_)) => StatusCode::NOT_FOUND,
                Some(StatsError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Service(err) => format!("{err:#}"),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_downcast() {
        let not_found = ApiError::from(anyhow::Error::from(StatsError::NotFound("s".into())));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::from(anyhow::Error::from(StatsError::invalid_response(
            "#1",
            "missing surveyId",
        )));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let other = ApiError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn context_does_not_hide_the_cause() {
        let err = anyhow::Error::from(StatsError::NotFound("s".into())).context("loading survey");
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);
    }
}
