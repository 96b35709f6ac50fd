//! Survey statistics aggregation.
//!
//! A pure function over a survey definition and its full response set:
//! response count, mean completion time, completion rate, and per-question
//! answer distributions. No I/O, no shared state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StatsError;
use crate::model::{Answer, Question, ResponseRecord, Scalar, SurveyDefinition};

/// Summary metrics for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    /// Number of response records supplied.
    pub total_responses: usize,
    /// Mean of the positive completion times, or 0 if none were reported.
    pub average_completion_time: f64,
    /// Answers given relative to `required questions × responses`, as a
    /// percentage. Not clamped: may exceed 100.
    pub completion_rate: f64,
    /// One entry per question, in survey order.
    pub question_stats: Vec<QuestionStats>,
}

/// Answer distribution for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub question_title: String,
    /// Distinct answers in the order they were first seen.
    pub responses: Vec<AnswerFrequency>,
}

/// How often one distinct answer was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFrequency {
    pub answer: String,
    pub count: usize,
    /// `count / total responses × 100`.
    pub percentage: f64,
}

/// Compute statistics for a survey from its materialized response set.
pub fn compute_statistics(
    survey: &SurveyDefinition,
    responses: &[ResponseRecord],
) -> StatisticsReport {
    let total_responses = responses.len();

    let foreign = responses
        .iter()
        .filter(|r| r.survey_id != survey.id)
        .count();
    if foreign > 0 {
        tracing::warn!(
            survey = %survey.id,
            foreign,
            "responses reference a different survey; counting them anyway"
        );
    }

    let report = StatisticsReport {
        total_responses,
        average_completion_time: average_completion_time(responses),
        completion_rate: completion_rate(survey, responses),
        question_stats: survey
            .questions
            .iter()
            .map(|q| question_stats(q, responses, total_responses))
            .collect(),
    };

    tracing::debug!(
        survey = %survey.id,
        total = report.total_responses,
        avg_time = report.average_completion_time,
        completion_rate = report.completion_rate,
        "computed survey statistics"
    );

    report
}

/// Validate raw JSON response records and compute statistics.
///
/// Fails on the first record whose shape cannot be interpreted; nothing is
/// dropped or coerced.
pub fn compute_statistics_from_raw(
    survey: &SurveyDefinition,
    raw_responses: &[Value],
) -> Result<StatisticsReport, StatsError> {
    let responses = raw_responses
        .iter()
        .enumerate()
        .map(|(i, value)| ResponseRecord::from_json(i, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(compute_statistics(survey, &responses))
}

/// Mean of positive completion times. Zero, negative, and missing times
/// are left out of both the sum and the count.
fn average_completion_time(responses: &[ResponseRecord]) -> f64 {
    let (sum, count) = responses
        .iter()
        .filter_map(ResponseRecord::reported_completion_time)
        .fold((0.0f64, 0usize), |(sum, count), t| (sum + t, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn completion_rate(survey: &SurveyDefinition, responses: &[ResponseRecord]) -> f64 {
    let total = responses.len();
    if total == 0 {
        return 0.0;
    }

    let required = survey.required_question_count();
    if required == 0 {
        return 100.0;
    }

    // Every answered question counts, required or not.
    let answered: usize = responses.iter().map(|r| r.answers.len()).sum();
    answered as f64 / (total * required) as f64 * 100.0
}

fn question_stats(
    question: &Question,
    responses: &[ResponseRecord],
    total_responses: usize,
) -> QuestionStats {
    let mut tally = Tally::default();

    for answer in responses.iter().filter_map(|r| r.answers.get(&question.id)) {
        match answer {
            Answer::Multi(values) => {
                for value in values {
                    tally.add(value);
                }
            }
            Answer::Scalar(value) if value.is_falsy() => {}
            Answer::Scalar(value) => tally.add(value),
        }
    }

    QuestionStats {
        question_id: question.id.clone(),
        question_title: question.title.clone(),
        responses: tally
            .entries
            .into_iter()
            .map(|(answer, count)| AnswerFrequency {
                answer,
                count,
                percentage: percentage(count, total_responses),
            })
            .collect(),
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Frequency counter that remembers first-seen order.
#[derive(Default)]
struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, value: &Scalar) {
        let label = value.label();
        match self.index.get(&label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, 1));
            }
        }
    }
}
