//! Dataset loading and validation.
//!
//! A dataset is either a single JSON file `{"surveys": [...], "responses": [...]}`
//! or a directory with `surveys/*.json` and `responses/*.json`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::StatsError;
use crate::model::{Answer, ResponseRecord, SurveyDefinition};

/// Surveys together with their collected responses.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub surveys: Vec<SurveyDefinition>,
    pub responses: Vec<ResponseRecord>,
}

impl Dataset {
    /// Look up a survey by id.
    pub fn survey(&self, id: &str) -> Option<&SurveyDefinition> {
        self.surveys.iter().find(|s| s.id == id)
    }

    /// Responses recorded against a survey, in load order.
    pub fn responses_for(&self, survey_id: &str) -> Vec<ResponseRecord> {
        self.responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .cloned()
            .collect()
    }
}

/// Intermediate structure for single-file datasets.
#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    surveys: Vec<SurveyDefinition>,
    #[serde(default)]
    responses: Vec<Value>,
}

/// A survey file holds one survey or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SurveyFile {
    Many(Vec<SurveyDefinition>),
    One(Box<SurveyDefinition>),
}

/// Parse raw response values, naming records by position when they have no id.
pub fn parse_responses(values: &[Value]) -> Result<Vec<ResponseRecord>, StatsError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ResponseRecord::from_json(i, v))
        .collect()
}

/// Parse a single JSON dataset file.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse a JSON dataset string (useful for testing).
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    let parsed: DatasetFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse dataset JSON: {}", source_path.display()))?;

    let responses = parse_responses(&parsed.responses)
        .with_context(|| format!("invalid response in {}", source_path.display()))?;

    Ok(Dataset {
        surveys: parsed.surveys,
        responses,
    })
}

/// Load a dataset directory: `surveys/*.json` and `responses/*.json`.
///
/// Unreadable survey files are skipped with a warning. Response files are
/// not: a response that cannot be interpreted would skew every statistic
/// computed from the dataset.
pub fn load_dataset_directory(dir: &Path) -> Result<Dataset> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut dataset = Dataset::default();

    for path in json_files(&dir.join("surveys"))? {
        let parsed = std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|c| serde_json::from_str::<SurveyFile>(&c).map_err(anyhow::Error::from));
        match parsed {
            Ok(SurveyFile::Many(surveys)) => dataset.surveys.extend(surveys),
            Ok(SurveyFile::One(survey)) => dataset.surveys.push(*survey),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }

    for path in json_files(&dir.join("responses"))? {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read responses: {}", path.display()))?;
        let values: Vec<Value> = serde_json::from_str(&content)
            .with_context(|| format!("responses file must hold a JSON array: {}", path.display()))?;
        let records = parse_responses(&values)
            .with_context(|| format!("invalid response in {}", path.display()))?;
        dataset.responses.extend(records);
    }

    tracing::debug!(
        surveys = dataset.surveys.len(),
        responses = dataset.responses.len(),
        "loaded dataset from {}",
        dir.display()
    );

    Ok(dataset)
}

/// Load a dataset from a file or a directory.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if path.is_dir() {
        load_dataset_directory(path)
    } else {
        parse_dataset(path)
    }
}

/// Sorted `.json` files directly inside `dir`. A missing directory is empty.
fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A warning from survey validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The question concerned (if applicable).
    pub question_id: Option<String>,
    /// The response concerned (if applicable).
    pub response: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn survey(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            response: None,
            message: message.into(),
        }
    }

    fn question(question_id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question_id.to_string()),
            response: None,
            message: message.into(),
        }
    }

    fn response(response: &str, question_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            response: Some(response.to_string()),
            message: message.into(),
        }
    }
}

/// Check a survey and its responses for problems that do not stop
/// statistics from being computed but usually indicate bad data.
///
/// `responses` are the ones filed under this survey; responses pointing at a
/// survey the dataset lacks are reported by the caller.
pub fn validate_survey(
    survey: &SurveyDefinition,
    responses: &[ResponseRecord],
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if survey.questions.is_empty() {
        warnings.push(ValidationWarning::survey("survey has no questions"));
    }

    let mut seen_ids = HashSet::new();
    for q in &survey.questions {
        if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &survey.questions {
        if q.title.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question title is empty"));
        }
        if q.question_type.is_choice() && q.options.is_empty() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("{} question has no options", q.question_type),
            ));
        }
    }

    for (i, r) in responses.iter().enumerate() {
        let label = r.id.clone().unwrap_or_else(|| format!("#{}", i + 1));

        for (question_id, answer) in &r.answers {
            let Some(q) = survey.question(question_id) else {
                warnings.push(ValidationWarning::response(
                    &label,
                    Some(question_id.as_str()),
                    "answer to a question not in the survey",
                ));
                continue;
            };

            let values = match answer {
                Answer::Multi(values) => {
                    if !q.question_type.is_multi_valued() {
                        warnings.push(ValidationWarning::response(
                            &label,
                            Some(question_id.as_str()),
                            format!("several values given to a {} question", q.question_type),
                        ));
                    }
                    values.iter().collect::<Vec<_>>()
                }
                Answer::Scalar(value) => vec![value],
            };

            if q.question_type.is_choice() && !q.options.is_empty() {
                for value in values.into_iter().filter(|v| !v.is_blank()) {
                    let label_text = value.label();
                    if !q.options.iter().any(|o| *o == label_text) {
                        warnings.push(ValidationWarning::response(
                            &label,
                            Some(question_id.as_str()),
                            format!("'{label_text}' is not one of the options"),
                        ));
                    }
                }
            }
        }
    }

    warnings
}
