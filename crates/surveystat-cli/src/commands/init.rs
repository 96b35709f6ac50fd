//! The `surveystat init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("surveystat.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data/surveys")?;
    std::fs::create_dir_all("data/responses")?;
    write_if_missing(Path::new("data/surveys/team-pulse.json"), EXAMPLE_SURVEY)?;
    write_if_missing(Path::new("data/responses/team-pulse.json"), EXAMPLE_RESPONSES)?;

    println!("\nNext steps:");
    println!("  1. Run: surveystat validate --data data");
    println!("  2. Run: surveystat stats --survey team-pulse");
    println!("  3. Run: surveystat serve, then open /surveys/team-pulse/statistics");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# surveystat configuration

bind = "127.0.0.1:8080"
output_dir = "./surveystat-results"

[store]
type = "json"
data_dir = "./data"

# To read from a Supabase (PostgREST) project instead:
#
# [store]
# type = "rest"
# base_url = "https://<project>.supabase.co"
# api_key = "${SURVEYSTAT_API_KEY}"
# timeout_secs = 30
"#;

const EXAMPLE_SURVEY: &str = r#"{
  "id": "team-pulse",
  "title": "Team pulse",
  "description": "A quick weekly check-in",
  "status": "active",
  "createdAt": "2025-01-06T09:00:00Z",
  "questions": [
    {
      "id": "mood",
      "title": "How was your week?",
      "type": "single-choice",
      "required": true,
      "options": ["great", "okay", "rough"]
    },
    {
      "id": "focus",
      "title": "What took most of your time?",
      "type": "multi-choice",
      "options": ["meetings", "coding", "reviews", "support"]
    },
    {
      "id": "score",
      "title": "Rate the sprint from 1 to 5",
      "type": "rating",
      "required": true
    },
    {
      "id": "notes",
      "title": "Anything else?",
      "type": "free-text"
    }
  ]
}
"#;

const EXAMPLE_RESPONSES: &str = r#"[
  {
    "id": "r1",
    "surveyId": "team-pulse",
    "answers": {"mood": "great", "focus": ["coding", "reviews"], "score": 5},
    "completionTime": 48
  },
  {
    "id": "r2",
    "surveyId": "team-pulse",
    "answers": {"mood": "okay", "focus": ["meetings"], "score": 3, "notes": "Too many syncs"},
    "completionTime": 95
  },
  {
    "id": "r3",
    "surveyId": "team-pulse",
    "answers": {"mood": "great", "score": 4}
  }
]
"#;
