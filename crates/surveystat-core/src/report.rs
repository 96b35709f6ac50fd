//! Statistics snapshots with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{SurveyDefinition, SurveyStatus};
use crate::statistics::StatisticsReport;

/// A statistics report captured at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    /// Unique snapshot identifier.
    pub id: Uuid,
    /// When the statistics were computed.
    pub generated_at: DateTime<Utc>,
    /// Summary of the survey (without the full question definitions).
    pub survey: SurveySummary,
    /// The computed statistics.
    pub statistics: StatisticsReport,
}

/// Summary of a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: String,
    pub title: String,
    pub status: SurveyStatus,
    pub question_count: usize,
}

impl From<&SurveyDefinition> for SurveySummary {
    fn from(survey: &SurveyDefinition) -> Self {
        Self {
            id: survey.id.clone(),
            title: survey.title.clone(),
            status: survey.status,
            question_count: survey.questions.len(),
        }
    }
}

impl StatisticsSnapshot {
    /// Wrap freshly computed statistics.
    pub fn new(survey: &SurveyDefinition, statistics: StatisticsReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            survey: SurveySummary::from(survey),
            statistics,
        }
    }

    /// Save the snapshot as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
        let snapshot: StatisticsSnapshot =
            serde_json::from_str(&content).context("failed to parse snapshot JSON")?;
        Ok(snapshot)
    }

    /// File stem used when writing this snapshot to an output directory.
    pub fn file_stem(&self) -> String {
        format!(
            "stats-{}-{}",
            sanitize(&self.survey.id),
            self.generated_at.format("%Y-%m-%dT%H%M%S")
        )
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
