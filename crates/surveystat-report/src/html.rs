//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use surveystat_core::report::StatisticsSnapshot;
use surveystat_core::statistics::QuestionStats;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a statistics snapshot.
pub fn generate_html(snapshot: &StatisticsSnapshot) -> String {
    let stats = &snapshot.statistics;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>surveystat report: {}</title>\n",
        html_escape(&snapshot.survey.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n",
        html_escape(&snapshot.survey.title)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Survey <code>{}</code> | {} | {} questions | {}</p>\n",
        html_escape(&snapshot.survey.id),
        snapshot.survey.status,
        snapshot.survey.question_count,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str(
        "<thead><tr><th>Responses</th><th>Avg completion time</th><th>Completion rate</th></tr></thead>\n",
    );
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{:.1}s</td><td class=\"{}\">{:.1}%</td></tr></tbody>\n",
        stats.total_responses,
        stats.average_completion_time,
        rate_class(stats.completion_rate),
        stats.completion_rate,
    ));
    html.push_str("</table>\n");
    html.push_str("</section>\n");

    // Per-question breakdown
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    for (index, question) in stats.question_stats.iter().enumerate() {
        html.push_str(&question_section(index, question));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(snapshot)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(snapshot: &StatisticsSnapshot, path: &Path) -> Result<()> {
    let html = generate_html(snapshot);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn rate_class(rate: f64) -> &'static str {
    if rate >= 80.0 {
        "good"
    } else if rate >= 50.0 {
        "fair"
    } else {
        "poor"
    }
}

fn question_section(index: usize, question: &QuestionStats) -> String {
    let table_id = format!("q{index}");
    let mut section = String::new();

    section.push_str("<article class=\"question\">\n");
    section.push_str(&format!(
        "<h3>{} <span class=\"meta\">({})</span></h3>\n",
        html_escape(&question.question_title),
        html_escape(&question.question_id)
    ));

    if question.responses.is_empty() {
        section.push_str("<p class=\"meta\">No answers yet.</p>\n");
        section.push_str("</article>\n");
        return section;
    }

    section.push_str(&generate_bar_chart(question));

    section.push_str(&format!("<table class=\"answers\" id=\"{table_id}\">\n"));
    section.push_str(&format!(
        "<thead><tr><th onclick=\"sortTable('{table_id}', 0)\">Answer</th><th onclick=\"sortTable('{table_id}', 1)\">Count</th><th onclick=\"sortTable('{table_id}', 2)\">Share</th></tr></thead>\n"
    ));
    section.push_str("<tbody>\n");
    for freq in &question.responses {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td></tr>\n",
            html_escape(&freq.answer),
            freq.count,
            freq.percentage
        ));
    }
    section.push_str("</tbody></table>\n");
    section.push_str("</article>\n");
    section
}

fn generate_bar_chart(question: &QuestionStats) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 200;

    let total_height = question.responses.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, freq) in question.responses.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = (freq.percentage / 100.0).clamp(0.0, 1.0);
        let width = (share * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&truncate_label(&freq.answer))
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#3b82f6\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% ({})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            freq.percentage,
            freq.count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Shorten long free-text answers so chart labels stay inside the margin.
fn truncate_label(label: &str) -> String {
    const MAX_CHARS: usize = 28;
    if label.chars().count() <= MAX_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_CHARS - 1).collect();
        format!("{head}…")
    }
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --poor: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; font-weight: normal; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.good { background: var(--good); }
.fair { background: var(--fair); }
.poor { background: var(--poor); }
article.question { margin-bottom: 2rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(id, col) {
  const table = document.getElementById(id);
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const numeric = col > 0;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = numeric ? parseFloat(va) - parseFloat(vb) : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
