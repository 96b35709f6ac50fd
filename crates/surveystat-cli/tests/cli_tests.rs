//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary isolated from any config in the user's home or cwd.
fn surveystat(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("surveystat").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("SURVEYSTAT_DATA_DIR")
        .env_remove("SURVEYSTAT_API_KEY");
    cmd
}

fn dataset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../datasets")
        .join(name)
}

#[test]
fn stats_text_output() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("lunch-poll")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch poll (lunch-poll)"))
        .stdout(predicate::str::contains("30.0s"))
        .stdout(predicate::str::contains("150.0%"))
        .stdout(predicate::str::contains("cheese"));
}

#[test]
fn stats_json_output() {
    let home = TempDir::new().unwrap();
    let output = surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("lunch-poll")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["totalResponses"], 2);
    assert_eq!(report["averageCompletionTime"], 30.0);
    assert_eq!(report["completionRate"], 150.0);

    let hungry = &report["questionStats"][0]["responses"];
    assert_eq!(hungry[0]["answer"], "yes");
    assert_eq!(hungry[0]["percentage"], 50.0);
    assert_eq!(hungry[1]["answer"], "no");

    let toppings = &report["questionStats"][1]["responses"];
    assert_eq!(toppings.as_array().unwrap().len(), 2);
}

#[test]
fn stats_from_dataset_directory() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("product-feedback")
        .arg("--data")
        .arg(dataset("product-feedback"))
        .assert()
        .success()
        .stdout(predicate::str::contains("92.0s"))
        .stdout(predicate::str::contains("116.7%"))
        .stdout(predicate::str::contains("66.7%"));
}

#[test]
fn stats_writes_reports() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("reports");

    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("lunch-poll")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .arg("--format")
        .arg("all")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML report"))
        .stderr(predicate::str::contains("Markdown report"));

    let mut extensions: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| {
            e.unwrap()
                .path()
                .extension()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    extensions.sort();
    assert_eq!(extensions, vec!["html", "json", "md"]);
}

#[test]
fn stats_unknown_survey_fails() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("nope")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("survey not found: nope"));
}

#[test]
fn stats_malformed_response_fails() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"surveys": [{"id": "s", "title": "S"}],
            "responses": [{"id": "r9", "surveyId": "s", "answers": {"q1": {"nested": true}}}]}"#,
    )
    .unwrap();

    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("s")
        .arg("--data")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("r9"))
        .stderr(predicate::str::contains("q1"));
}

#[test]
fn validate_clean_dataset() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("validate")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey: Lunch poll (2 questions, 2 responses)"))
        .stdout(predicate::str::contains("All surveys valid"));
}

#[test]
fn validate_reports_unknown_option() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("validate")
        .arg("--data")
        .arg(dataset("product-feedback"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[fb-2] [channel]"))
        .stdout(predicate::str::contains("'desktop' is not one of the options"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_reports_responses_for_unknown_survey() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("orphans.json");
    std::fs::write(
        &data,
        r#"{
  "surveys": [
    {"id": "pulse", "title": "Pulse", "questions": [
      {"id": "mood", "title": "Mood?", "type": "free-text"}
    ]}
  ],
  "responses": [
    {"id": "a", "surveyId": "pulse", "answers": {"mood": "fine"}},
    {"id": "b", "surveyId": "retired", "answers": {"mood": "meh"}},
    {"id": "c", "surveyId": "retired", "answers": {}}
  ]
}"#,
    )
    .unwrap();

    surveystat(&home)
        .arg("validate")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey: Pulse (1 questions, 1 responses)"))
        .stdout(predicate::str::contains(
            "WARNING: 2 response(s) reference unknown survey retired",
        ))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("validate")
        .arg("--data")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_surveys_newest_first() {
    let home = TempDir::new().unwrap();
    let output = surveystat(&home)
        .arg("list")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lunch = stdout.find("lunch-poll").unwrap();
    let office = stdout.find("office-move").unwrap();
    assert!(lunch < office);
}

#[test]
fn list_filters_by_status() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("list")
        .arg("--status")
        .arg("closed")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("office-move"))
        .stdout(predicate::str::contains("lunch-poll").not());
}

#[test]
fn list_rejects_unknown_status() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("list")
        .arg("--status")
        .arg("paused")
        .arg("--data")
        .arg(dataset("lunch-poll.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown survey status"));
}

#[test]
fn config_selects_data_dir() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("surveystat.toml"),
        format!(
            "[store]\ntype = \"json\"\ndata_dir = \"{}\"\n",
            dataset("product-feedback").display()
        ),
    )
    .unwrap();

    surveystat(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("product-feedback"))
        .stdout(predicate::str::contains("draft"));
}

#[test]
fn missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("list")
        .arg("--config")
        .arg("no-such-config.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_files() {
    let home = TempDir::new().unwrap();

    surveystat(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created surveystat.toml"))
        .stdout(predicate::str::contains("Created data/surveys/team-pulse.json"));

    assert!(home.path().join("surveystat.toml").exists());
    assert!(home.path().join("data/responses/team-pulse.json").exists());

    // The starter config and dataset work together out of the box.
    surveystat(&home)
        .arg("stats")
        .arg("--survey")
        .arg("team-pulse")
        .assert()
        .success()
        .stdout(predicate::str::contains("Team pulse (team-pulse)"))
        .stdout(predicate::str::contains("71.5s"));
}

#[test]
fn init_skips_existing() {
    let home = TempDir::new().unwrap();

    surveystat(&home).arg("init").assert().success();

    surveystat(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey response statistics"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    surveystat(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("surveystat"));
}
