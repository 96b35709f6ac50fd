//! Markdown summary output.
//!
//! Suitable for pasting into issues, chat, or a repository wiki.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use surveystat_core::report::StatisticsSnapshot;

/// Generate a Markdown document from a statistics snapshot.
pub fn generate_markdown(snapshot: &StatisticsSnapshot) -> String {
    let stats = &snapshot.statistics;
    let mut md = String::new();

    let _ = writeln!(md, "# {}\n", escape_inline(&snapshot.survey.title));
    let _ = writeln!(
        md,
        "Survey `{}` ({}), generated {}\n",
        snapshot.survey.id,
        snapshot.survey.status,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    md.push_str("| Responses | Avg completion time | Completion rate |\n");
    md.push_str("|---:|---:|---:|\n");
    let _ = writeln!(
        md,
        "| {} | {:.1}s | {:.1}% |",
        stats.total_responses, stats.average_completion_time, stats.completion_rate
    );

    for question in &stats.question_stats {
        let _ = writeln!(md, "\n## {}\n", escape_inline(&question.question_title));
        if question.responses.is_empty() {
            md.push_str("_No answers yet._\n");
            continue;
        }
        md.push_str("| Answer | Count | Share |\n");
        md.push_str("|---|---:|---:|\n");
        for freq in &question.responses {
            let _ = writeln!(
                md,
                "| {} | {} | {:.1}% |",
                escape_cell(&freq.answer),
                freq.count,
                freq.percentage
            );
        }
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(snapshot: &StatisticsSnapshot, path: &Path) -> Result<()> {
    let md = generate_markdown(snapshot);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}

fn escape_inline(s: &str) -> String {
    s.replace('\n', " ")
}

/// Table cells cannot contain raw pipes or line breaks.
fn escape_cell(s: &str) -> String {
    escape_inline(s).replace('|', "\\|")
}
