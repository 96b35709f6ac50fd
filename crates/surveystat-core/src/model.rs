//! Core data model types for surveystat.
//!
//! These are the survey definitions and response records that every
//! repository produces and the aggregator consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StatsError;

/// A survey: an ordered set of questions authored by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    /// Unique identifier for this survey.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Description shown to respondents.
    #[serde(default)]
    pub description: String,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: SurveyStatus,
    /// When the survey was created.
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque delivery settings owned by the distribution side.
    #[serde(default, alias = "delivery_config", skip_serializing_if = "Option::is_none")]
    pub delivery_config: Option<Value>,
}

impl SurveyDefinition {
    /// Create an active survey with no questions.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            questions: Vec::new(),
            status: SurveyStatus::default(),
            created_at: None,
            delivery_config: None,
        }
    }

    /// Append a question.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Set the lifecycle status.
    pub fn with_status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Number of questions marked required.
    pub fn required_question_count(&self) -> usize {
        self.questions.iter().filter(|q| q.required).count()
    }
}

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the survey.
    pub id: String,
    /// Question text.
    #[serde(default)]
    pub title: String,
    /// Whether the author marked the question mandatory.
    #[serde(default)]
    pub required: bool,
    /// Kind of answer expected.
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    /// Choice labels for choice questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            required: false,
            question_type,
            options: Vec::new(),
        }
    }

    /// Mark the question required or optional.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the choice labels.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[serde(alias = "radio", alias = "single")]
    SingleChoice,
    #[serde(alias = "checkbox", alias = "multiple-choice", alias = "multiple")]
    MultiChoice,
    #[default]
    #[serde(alias = "text", alias = "textarea")]
    FreeText,
    Rating,
    #[serde(alias = "boolean")]
    YesNo,
    /// Any kind this version does not know about.
    #[serde(other)]
    Other,
}

impl QuestionType {
    /// Whether answers are picked from a fixed list of options.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultiChoice)
    }

    /// Whether a respondent may give several values at once.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, QuestionType::MultiChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::SingleChoice => write!(f, "single-choice"),
            QuestionType::MultiChoice => write!(f, "multi-choice"),
            QuestionType::FreeText => write!(f, "free-text"),
            QuestionType::Rating => write!(f, "rating"),
            QuestionType::YesNo => write!(f, "yes-no"),
            QuestionType::Other => write!(f, "other"),
        }
    }
}

/// Survey lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Draft,
    #[default]
    Active,
    Closed,
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyStatus::Draft => write!(f, "draft"),
            SurveyStatus::Active => write!(f, "active"),
            SurveyStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(SurveyStatus::Draft),
            "active" | "open" | "published" => Ok(SurveyStatus::Active),
            "closed" | "archived" => Ok(SurveyStatus::Closed),
            other => Err(format!("unknown survey status: {other}")),
        }
    }
}

/// A single answer value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// The label this value is tallied under.
    ///
    /// Integral numbers print without a fractional part, so `3` and `"3"`
    /// share a bucket.
    pub fn label(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => number_label(*n),
            Scalar::Text(s) => s.clone(),
        }
    }

    /// Null or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Blank, `false`, zero, or NaN. A top-level answer like this is left
    /// out of the question's distribution.
    pub fn is_falsy(&self) -> bool {
        match self {
            Scalar::Bool(b) => !b,
            Scalar::Number(n) => *n == 0.0 || n.is_nan(),
            other => other.is_blank(),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

fn number_label(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// What a respondent gave for one question: one value, or several for
/// multi-choice questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Scalar(Scalar),
    Multi(Vec<Scalar>),
}

impl Answer {
    /// Collection answer from anything convertible to scalars.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Answer::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Interpret a raw JSON answer value.
    ///
    /// Objects and nested arrays are rejected rather than coerced.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    Scalar::from_json(item).ok_or_else(|| {
                        format!("element {i} of a collection answer must be a scalar value")
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Answer::Multi),
            Value::Object(_) => Err("answer must be a scalar or a list of scalars".to_string()),
            other => Scalar::from_json(other)
                .map(Answer::Scalar)
                .ok_or_else(|| "answer is not a representable number".to_string()),
        }
    }
}

impl From<Scalar> for Answer {
    fn from(value: Scalar) -> Self {
        Answer::Scalar(value)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Scalar(s.into())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Scalar(s.into())
    }
}

impl From<f64> for Answer {
    fn from(n: f64) -> Self {
        Answer::Scalar(n.into())
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Answer::Scalar(n.into())
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Answer::Scalar(b.into())
    }
}

/// One respondent's submitted answers to a survey.
///
/// Deserialization goes through [`ResponseRecord::from_json`], so malformed
/// answer payloads surface as [`StatsError::Validation`] instead of being
/// silently coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct ResponseRecord {
    /// Storage identifier, when the record has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The survey this response belongs to.
    pub survey_id: String,
    /// Answers keyed by question id. Unanswered questions are absent.
    pub answers: BTreeMap<String, Answer>,
    /// Seconds taken to complete the survey, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<f64>,
}

impl ResponseRecord {
    /// Create an empty response for a survey.
    pub fn new(survey_id: impl Into<String>) -> Self {
        Self {
            id: None,
            survey_id: survey_id.into(),
            answers: BTreeMap::new(),
            completion_time: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_answer(
        mut self,
        question_id: impl Into<String>,
        answer: impl Into<Answer>,
    ) -> Self {
        self.answers.insert(question_id.into(), answer.into());
        self
    }

    pub fn with_completion_time(mut self, seconds: f64) -> Self {
        self.completion_time = Some(seconds);
        self
    }

    /// Completion time if it counts toward averages (present and positive).
    pub fn reported_completion_time(&self) -> Option<f64> {
        self.completion_time.filter(|t| *t > 0.0)
    }

    /// Parse a raw JSON record.
    ///
    /// `position` is the 0-based index of the record in its batch and names
    /// the record in errors when it carries no `id`. Field names are accepted
    /// in camelCase or snake_case.
    pub fn from_json(position: usize, value: &Value) -> Result<Self, StatsError> {
        parse_record(value, || format!("#{}", position + 1))
    }
}

impl TryFrom<Value> for ResponseRecord {
    type Error = StatsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_record(&value, || "(unidentified)".to_string())
    }
}

fn parse_record(
    value: &Value,
    fallback_label: impl FnOnce() -> String,
) -> Result<ResponseRecord, StatsError> {
    let Value::Object(fields) = value else {
        return Err(StatsError::invalid_response(
            fallback_label(),
            "response must be a JSON object",
        ));
    };

    let id = fields.get("id").and_then(identifier);
    let label = id.clone().unwrap_or_else(fallback_label);

    let survey_id = field(fields, "surveyId", "survey_id")
        .and_then(identifier)
        .ok_or_else(|| StatsError::invalid_response(&label, "missing surveyId"))?;

    let answers = match field(fields, "answers", "answers") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(question, raw)| {
                Answer::from_json(raw)
                    .map(|answer| (question.clone(), answer))
                    .map_err(|message| StatsError::invalid_answer(&label, question, message))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?,
        Some(_) => {
            return Err(StatsError::invalid_response(
                &label,
                "answers must be a mapping of question id to answer",
            ))
        }
    };

    let completion_time = match field(fields, "completionTime", "completion_time") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => {
            return Err(StatsError::invalid_response(
                &label,
                "completionTime must be a number of seconds",
            ))
        }
    };

    Ok(ResponseRecord {
        id,
        survey_id,
        answers,
        completion_time,
    })
}

fn field<'a>(
    fields: &'a serde_json::Map<String, Value>,
    camel: &str,
    snake: &str,
) -> Option<&'a Value> {
    fields.get(camel).or_else(|| fields.get(snake))
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
