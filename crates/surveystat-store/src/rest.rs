//! PostgREST repository (Supabase and compatible APIs).
//!
//! Reads the `surveys` and `survey_responses` tables through the REST
//! interface. Survey status comes from a `status` column when present,
//! otherwise from `delivery_config.status`, otherwise it defaults to active.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use surveystat_core::model::{Question, ResponseRecord, SurveyDefinition, SurveyStatus};
use surveystat_core::traits::{sort_newest_first, SurveyRepository};

use crate::error::StoreError;

const SURVEYS_TABLE: &str = "surveys";
const RESPONSES_TABLE: &str = "survey_responses";

/// Repository reading from a PostgREST endpoint.
pub struct RestRepository {
    base_url: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl RestRepository {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
            client,
        })
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> anyhow::Result<Url> {
        let url = Url::parse_with_params(&format!("{}/rest/v1/{table}", self.base_url), params)
            .map_err(|e| StoreError::NetworkError(format!("invalid store URL: {e}")))?;
        Ok(url)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<Vec<T>> {
        let mut request = self.client.get(url).header("Accept", "application/json");
        if !self.api_key.is_empty() {
            request = request
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                StoreError::NetworkError(format!("store not reachable at {}", self.base_url))
            } else {
                StoreError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::AuthenticationFailed(body).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let rows: Vec<T> = response.json().await.map_err(|e| StoreError::ApiError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;
        Ok(rows)
    }
}

#[derive(Deserialize)]
struct SurveyRow {
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    questions: Value,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    delivery_config: Option<Value>,
    #[serde(default)]
    created_at: Option<String>,
}

impl SurveyRow {
    fn into_survey(self) -> Result<SurveyDefinition, StoreError> {
        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let malformed = |message: String| StoreError::MalformedRow {
            table: SURVEYS_TABLE,
            id: id.clone(),
            message,
        };

        let questions = parse_questions(self.questions).map_err(malformed)?;
        let status = resolve_status(&id, self.status.as_deref(), self.delivery_config.as_ref());
        let created_at = match self.created_at.as_deref() {
            Some(raw) => Some(parse_timestamp(raw).map_err(malformed)?),
            None => None,
        };

        Ok(SurveyDefinition {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            questions,
            status,
            created_at,
            delivery_config: self.delivery_config,
            id,
        })
    }
}

fn parse_questions(value: Value) -> Result<Vec<Question>, String> {
    let value = match value {
        Value::Null => return Ok(Vec::new()),
        // some clients store the question list as an encoded JSON string
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| format!("questions column is not valid JSON: {e}"))?,
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("invalid questions: {e}"))
}

fn resolve_status(id: &str, column: Option<&str>, delivery: Option<&Value>) -> SurveyStatus {
    let raw = column.or_else(|| {
        delivery
            .and_then(|config| config.get("status"))
            .and_then(Value::as_str)
    });
    match raw.map(str::parse::<SurveyStatus>) {
        Some(Ok(status)) => status,
        Some(Err(e)) => {
            tracing::warn!(survey = id, "{e}; treating survey as active");
            SurveyStatus::Active
        }
        None => SurveyStatus::Active,
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid created_at '{raw}': {e}"))
}

#[async_trait]
impl SurveyRepository for RestRepository {
    fn name(&self) -> &str {
        "rest"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_survey_by_id(&self, id: &str) -> anyhow::Result<Option<SurveyDefinition>> {
        let filter = format!("eq.{id}");
        let url = self.table_url(SURVEYS_TABLE, &[("select", "*"), ("id", filter.as_str())])?;
        let rows: Vec<SurveyRow> = self.fetch_rows(url).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_survey()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_responses_for_survey(
        &self,
        survey_id: &str,
    ) -> anyhow::Result<Vec<ResponseRecord>> {
        let filter = format!("eq.{survey_id}");
        let url = self.table_url(
            RESPONSES_TABLE,
            &[("select", "*"), ("survey_id", filter.as_str())],
        )?;
        let rows: Vec<Value> = self.fetch_rows(url).await?;
        tracing::debug!(rows = rows.len(), "fetched responses");

        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ResponseRecord::from_json(i, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_surveys(&self) -> anyhow::Result<Vec<SurveyDefinition>> {
        let url = self.table_url(
            SURVEYS_TABLE,
            &[("select", "*"), ("order", "created_at.desc.nullslast")],
        )?;
        let rows: Vec<SurveyRow> = self.fetch_rows(url).await?;
        let mut surveys = rows
            .into_iter()
            .map(SurveyRow::into_survey)
            .collect::<Result<Vec<_>, _>>()?;
        // ties and undated rows ordered the same way as the other backends
        sort_newest_first(&mut surveys);
        Ok(surveys)
    }
}
