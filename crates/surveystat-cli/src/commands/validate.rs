//! The `surveystat validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use surveystat_core::parser::{load_dataset, validate_survey};

pub fn execute(data_path: PathBuf) -> Result<()> {
    // Malformed responses fail here, naming the record and question.
    let dataset = load_dataset(&data_path)?;

    let mut total_warnings = 0;

    for survey in &dataset.surveys {
        let responses = dataset.responses_for(&survey.id);
        println!(
            "Survey: {} ({} questions, {} responses)",
            survey.title,
            survey.questions.len(),
            responses.len()
        );

        let warnings = validate_survey(survey, &responses);
        for w in &warnings {
            let mut prefix = String::from(" ");
            if let Some(response) = &w.response {
                prefix.push_str(&format!(" [{response}]"));
            }
            if let Some(question) = &w.question_id {
                prefix.push_str(&format!(" [{question}]"));
            }
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    let mut orphans: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &dataset.responses {
        if dataset.survey(&r.survey_id).is_none() {
            *orphans.entry(r.survey_id.as_str()).or_default() += 1;
        }
    }
    for (survey_id, count) in &orphans {
        println!("WARNING: {count} response(s) reference unknown survey {survey_id}");
    }
    total_warnings += orphans.len();

    if total_warnings == 0 {
        println!("All surveys valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
