//! The `surveystat stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};

use surveystat_core::report::StatisticsSnapshot;
use surveystat_core::service::survey_snapshot;
use surveystat_report::html::write_html_report;
use surveystat_report::markdown::write_markdown_report;

pub async fn execute(
    survey_id: String,
    data: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, repository) = super::open_repository(data, config_path.as_deref())?;
    let snapshot = survey_snapshot(repository.as_ref(), &survey_id).await?;

    let formats: Vec<&str> = if format == "all" {
        vec!["text", "json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    let output = output.unwrap_or(config.output_dir);
    let stem = snapshot.file_stem();

    for fmt in &formats {
        match *fmt {
            "text" => print_summary(&snapshot),
            // `all` keeps stdout readable and persists the snapshot instead
            "json" if format == "all" => {
                let path = output.join(format!("{stem}.json"));
                snapshot.save_json(&path)?;
                eprintln!("Snapshot saved to: {}", path.display());
            }
            "json" => {
                println!("{}", serde_json::to_string_pretty(&snapshot.statistics)?);
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(&snapshot, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("{stem}.md"));
                write_markdown_report(&snapshot, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(snapshot: &StatisticsSnapshot) {
    let stats = &snapshot.statistics;

    println!("{} ({})", snapshot.survey.title, snapshot.survey.id);

    let mut table = Table::new();
    table.set_header(vec!["Responses", "Avg completion time", "Completion rate"]);
    table.add_row(vec![
        Cell::new(stats.total_responses),
        Cell::new(format!("{:.1}s", stats.average_completion_time)),
        Cell::new(format!("{:.1}%", stats.completion_rate)),
    ]);
    println!("{table}");

    for question in &stats.question_stats {
        println!("\n{} [{}]", question.question_title, question.question_id);
        if question.responses.is_empty() {
            println!("  (no answers)");
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Answer", "Count", "Share"]);
        for freq in &question.responses {
            table.add_row(vec![
                Cell::new(&freq.answer),
                Cell::new(freq.count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", freq.percentage)).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }
}
