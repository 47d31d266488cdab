//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use degreetrack_core::model::RecordStatus;
use degreetrack_core::parser::parse_plan;

fn degreetrack() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("degreetrack").unwrap();
    cmd.env_remove("DEGREETRACK_CATALOG")
        .env_remove("DEGREETRACK_PLAN");
    cmd
}

/// A temp dir populated by `degreetrack init`.
fn initialized_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    degreetrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

fn record_ids(plan: &Path) -> Vec<String> {
    parse_plan(plan)
        .unwrap()
        .records
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn help_output() {
    degreetrack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Degree requirement tracking and planning",
        ));
}

#[test]
fn version_output() {
    degreetrack()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("degreetrack"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    degreetrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created degreetrack.toml"))
        .stdout(predicate::str::contains("Created catalog.toml"))
        .stdout(predicate::str::contains("Created plan.toml"));

    assert!(dir.path().join("degreetrack.toml").exists());
    assert!(dir.path().join("catalog.toml").exists());
    assert!(dir.path().join("plan.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_files() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 courses"))
        .stdout(predicate::str::contains("All files valid"));
}

#[test]
fn validate_flags_unknown_course() {
    let dir = initialized_dir();
    let plan = dir.path().join("other.toml");
    std::fs::write(
        &plan,
        r#"
[profile]
student = "other"

[[records]]
id = "x1"
course = "ghost"
term = "WS"
year = 2025
"#,
    )
    .unwrap();

    degreetrack()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--plan")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("[x1] WARNING"))
        .stdout(predicate::str::contains("unknown course 'ghost'"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn evaluate_sample_plan() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .arg("evaluate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Degree plan: student"))
        .stdout(predicate::str::contains("Software System Science (A1)"))
        .stdout(predicate::str::contains(
            "Progress: 6 / 120 credits passed, 9 planned, 114 remaining",
        ))
        .stdout(predicate::str::contains(
            "Missing: Master's Thesis (30 credits required).",
        ))
        .stdout(predicate::str::contains(
            "Add 24 more credits to Software System Science (A1).",
        ));
}

#[test]
fn evaluate_writes_all_formats_and_render_reads_json() {
    let dir = initialized_dir();
    let out = dir.path().join("out");

    degreetrack()
        .current_dir(dir.path())
        .args(["evaluate", "--format", "all", "--output"])
        .arg(&out)
        .assert()
        .success();

    let json = out.join("student.json");
    assert!(json.exists());
    assert!(out.join("student.md").exists());
    assert!(out.join("student.html").exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(report["summary"]["passed"], 6);
    assert_eq!(report["summary"]["remaining"], 114);

    let rendered = dir.path().join("rendered.md");
    degreetrack()
        .args(["render", "--format", "markdown", "--report"])
        .arg(&json)
        .arg("--output")
        .arg(&rendered)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&rendered)
        .unwrap()
        .contains("# Degree plan: student"));
}

#[test]
fn evaluate_rejects_unknown_format() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["evaluate", "--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn evaluate_plan_directory() {
    let dir = initialized_dir();
    let plans = dir.path().join("plans");
    std::fs::create_dir_all(&plans).unwrap();
    let sample = std::fs::read_to_string(dir.path().join("plan.toml")).unwrap();
    for student in ["alice", "bob"] {
        std::fs::write(
            plans.join(format!("{student}.toml")),
            sample.replace("student = \"student\"", &format!("student = \"{student}\"")),
        )
        .unwrap();
    }

    degreetrack()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--plan")
        .arg(&plans)
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob"))
        .stderr(predicate::str::contains("2/2 evaluated, 0 failed"));
}

#[test]
fn evaluate_missing_catalog_fails() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--catalog")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn catalog_search_and_group_filter() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["catalog", "--search", "thesis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("THE-999"))
        .stdout(predicate::str::contains("SSS-101").not());

    degreetrack()
        .current_dir(dir.path())
        .args(["catalog", "--group", "A3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEM-900"))
        .stdout(predicate::str::contains("PRJ-900"))
        .stdout(predicate::str::contains("2 course(s)"));
}

#[test]
fn semesters_view() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["semesters", "--count", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. WS 2025/26: 6 credits"))
        .stdout(predicate::str::contains("2. SS 2026: 6 credits"))
        .stdout(predicate::str::contains("3. WS 2026/27: 3 credits"))
        .stdout(predicate::str::contains("4. SS 2027: 0 credits"));
}

#[test]
fn edit_plan_records() {
    let dir = initialized_dir();
    let plan = dir.path().join("plan.toml");

    degreetrack()
        .current_dir(dir.path())
        .args(["add", "--course", "masters-thesis", "--term", "SS", "--year", "2027"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added record"))
        .stdout(predicate::str::contains("[planned] in SS 2027"));

    let ids = record_ids(&plan);
    assert_eq!(ids.len(), 4);
    let thesis = ids[3].clone();

    degreetrack()
        .current_dir(dir.path())
        .args(["status", "--record", &thesis, "passed"])
        .assert()
        .success();

    degreetrack()
        .current_dir(dir.path())
        .args(["move", "--record", &thesis, "--term", "WS", "--year", "2027"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in WS 2027/28"));

    degreetrack()
        .current_dir(dir.path())
        .args(["credits", "--record", "r3", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 credits (override)"));

    degreetrack()
        .current_dir(dir.path())
        .args(["remove", "--record", "r2"])
        .assert()
        .success();

    let saved = parse_plan(&plan).unwrap();
    assert_eq!(saved.records.len(), 3);
    let thesis_record = saved.records.iter().find(|r| r.id == thesis).unwrap();
    assert_eq!(thesis_record.status, RecordStatus::Passed);
    assert_eq!(thesis_record.placement.key(), "WS 2027");
    let seminar = saved.records.iter().find(|r| r.id == "r3").unwrap();
    assert_eq!(seminar.credit_override, Some(4));

    degreetrack()
        .current_dir(dir.path())
        .arg("evaluate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Progress: 36 / 120 credits passed, 4 planned, 84 remaining",
        ));
}

#[test]
fn add_defaults_to_start_semester() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["add", "--course", "bioinformatics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in WS 2025/26"));
}

#[test]
fn edit_errors_are_reported() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["remove", "--record", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("record not found: missing"));

    degreetrack()
        .current_dir(dir.path())
        .args(["add", "--course", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("course not found: ghost"));

    degreetrack()
        .current_dir(dir.path())
        .args(["status", "--record", "r1", "dropped"])
        .assert()
        .failure();
}

#[test]
fn add_rejects_course_already_in_plan() {
    let dir = initialized_dir();
    let plan = dir.path().join("plan.toml");

    degreetrack()
        .current_dir(dir.path())
        .args(["add", "--course", "formal-methods"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "course already in plan: formal-methods",
        ));

    assert_eq!(record_ids(&plan), vec!["r1", "r2", "r3"]);
}

#[test]
fn catalog_shows_plan_status() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["catalog", "--group", "A1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan"))
        .stdout(predicate::str::contains("passed"))
        .stdout(predicate::str::contains("in_progress"));
}

#[test]
fn semesters_warn_on_high_workload() {
    let dir = initialized_dir();

    degreetrack()
        .current_dir(dir.path())
        .args(["add", "--course", "masters-thesis"])
        .assert()
        .success();

    degreetrack()
        .current_dir(dir.path())
        .args(["semesters", "--count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. WS 2025/26: 36 credits"))
        .stdout(predicate::str::contains("⚠ High workload (36 credits)"))
        .stdout(predicate::str::contains("High workload (6 credits)").not());
}

#[test]
fn evaluate_rejects_duplicate_students_in_plan_directory() {
    let dir = initialized_dir();
    let sample = std::fs::read_to_string(dir.path().join("plan.toml")).unwrap();
    for sub in ["a", "b"] {
        let plans = dir.path().join("plans").join(sub);
        std::fs::create_dir_all(&plans).unwrap();
        std::fs::write(plans.join("jdoe.toml"), &sample).unwrap();
    }

    degreetrack()
        .current_dir(dir.path())
        .args(["evaluate", "--format", "json", "--plan", "plans"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate student 'student'"));

    assert!(!dir.path().join("degreetrack-reports").exists());
}

#[test]
fn evaluate_rejects_student_id_with_path_separator() {
    let dir = initialized_dir();
    let plan = dir.path().join("escape.toml");
    std::fs::write(&plan, "[profile]\nstudent = \"../escaped\"\n").unwrap();
    let out = dir.path().join("out");

    degreetrack()
        .current_dir(dir.path())
        .args(["evaluate", "--format", "json", "--plan"])
        .arg(&plan)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used as a report file name"));

    assert!(!dir.path().join("escaped.json").exists());
}
