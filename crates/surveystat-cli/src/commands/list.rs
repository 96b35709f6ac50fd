//! The `surveystat list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use surveystat_core::SurveyStatus;

pub async fn execute(
    status: Option<String>,
    data: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let status = status
        .map(|s| s.parse::<SurveyStatus>().map_err(anyhow::Error::msg))
        .transpose()?;

    let (_, repository) = super::open_repository(data, config_path.as_deref())?;
    let surveys = match status {
        Some(status) => repository.surveys_by_status(status).await?,
        None => repository.list_surveys().await?,
    };

    if surveys.is_empty() {
        println!("No surveys found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Questions", "Created"]);
    for survey in &surveys {
        let created = survey
            .created_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&survey.id),
            Cell::new(&survey.title),
            Cell::new(survey.status),
            Cell::new(survey.questions.len()),
            Cell::new(created),
        ]);
    }
    println!("{table}");

    Ok(())
}
