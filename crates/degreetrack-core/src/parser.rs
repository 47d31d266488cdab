//! TOML catalog and plan parsing.
//!
//! Loads catalogs and student plans from TOML files and directories, writes
//! plans back, and validates rules, catalogs, and plans.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Catalog, Course, CourseRecord, Profile, RecordStatus, StudentPlan};
use crate::rules::RequirementNode;
use crate::semester::{Term, TermPlacement};

/// Intermediate TOML structure for catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    courses: Vec<TomlCourse>,
}

#[derive(Debug, Deserialize)]
struct TomlCourse {
    id: String,
    code: String,
    title: String,
    credits: u32,
    group: String,
    #[serde(default, alias = "area")]
    sub_group: Option<String>,
    #[serde(default)]
    variable_credits: bool,
    #[serde(default)]
    max_credits: Option<u32>,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    exam_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Intermediate TOML structure for plan files, used in both directions.
#[derive(Debug, Serialize, Deserialize)]
struct TomlPlanFile {
    #[serde(default)]
    profile: TomlProfile,
    #[serde(default)]
    records: Vec<TomlRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student: Option<String>,
    #[serde(default = "default_term_str")]
    start_term: String,
    #[serde(default = "default_year")]
    start_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    focus: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlRecord {
    id: String,
    course: String,
    #[serde(default = "default_status_str")]
    status: String,
    term: String,
    year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credits: Option<u32>,
}

impl Default for TomlProfile {
    fn default() -> Self {
        Self {
            student: None,
            start_term: default_term_str(),
            start_year: default_year(),
            focus: None,
        }
    }
}

fn default_term_str() -> String {
    TermPlacement::default().term.to_string()
}

fn default_year() -> i32 {
    TermPlacement::default().year
}

fn default_status_str() -> String {
    "planned".to_string()
}

/// Parse a catalog TOML file.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a catalog from a TOML string (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let courses = parsed
        .courses
        .into_iter()
        .map(|c| Course {
            id: c.id,
            code: c.code,
            title: c.title,
            credits: c.credits,
            group: c.group,
            sub_group: c.sub_group,
            variable_credits: c.variable_credits,
            max_credits: c.max_credits,
            frequency: c.frequency,
            language: c.language,
            exam_type: c.exam_type,
            description: c.description,
        })
        .collect();

    Ok(Catalog::new(courses))
}

/// Parse a student plan TOML file.
pub fn parse_plan(path: &Path) -> Result<StudentPlan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;

    parse_plan_str(&content, path)
}

/// Parse a plan from a TOML string.
///
/// Without an explicit `student` in the profile, the file stem names the
/// student.
pub fn parse_plan_str(content: &str, source_path: &Path) -> Result<StudentPlan> {
    let parsed: TomlPlanFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let student = parsed.profile.student.unwrap_or_else(|| {
        source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "student".to_string())
    });
    let start_term: Term = parsed
        .profile
        .start_term
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let records = parsed
        .records
        .into_iter()
        .map(|r| -> Result<CourseRecord> {
            let status: RecordStatus = r
                .status
                .parse()
                .map_err(|e: String| anyhow::anyhow!("record '{}': {}", r.id, e))?;
            let term: Term = r
                .term
                .parse()
                .map_err(|e: String| anyhow::anyhow!("record '{}': {}", r.id, e))?;

            Ok(CourseRecord {
                id: r.id,
                course_id: r.course,
                status,
                placement: TermPlacement::new(term, r.year),
                credit_override: r.credits,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StudentPlan {
        profile: Profile {
            student,
            start: TermPlacement::new(start_term, parsed.profile.start_year),
            focus: parsed.profile.focus,
        },
        records,
    })
}

/// Render a plan in the TOML plan file format.
pub fn plan_to_toml(plan: &StudentPlan) -> Result<String> {
    let file = TomlPlanFile {
        profile: TomlProfile {
            student: Some(plan.profile.student.clone()),
            start_term: plan.profile.start.term.to_string(),
            start_year: plan.profile.start.year,
            focus: plan.profile.focus.clone(),
        },
        records: plan
            .records
            .iter()
            .map(|r| TomlRecord {
                id: r.id.clone(),
                course: r.course_id.clone(),
                status: r.status.to_string(),
                term: r.placement.term.to_string(),
                year: r.placement.year,
                credits: r.credit_override,
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize plan")
}

/// Write a plan to a TOML file, creating parent directories.
pub fn save_plan(plan: &StudentPlan, path: &Path) -> Result<()> {
    let content = plan_to_toml(plan)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write plan to {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` plan files from a directory.
///
/// Files that fail to parse are skipped with a warning. Two files resolving
/// to the same student id are an error naming both paths.
pub fn load_plan_directory(dir: &Path) -> Result<Vec<(PathBuf, StudentPlan)>> {
    let plans = collect_plans(dir)?;

    {
        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for (path, plan) in &plans {
            if let Some(first) = seen.insert(&plan.profile.student, path) {
                anyhow::bail!(
                    "duplicate student '{}' in {} and {}",
                    plan.profile.student,
                    first.display(),
                    path.display()
                );
            }
        }
    }

    Ok(plans)
}

fn collect_plans(dir: &Path) -> Result<Vec<(PathBuf, StudentPlan)>> {
    let mut plans = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            plans.extend(collect_plans(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_plan(&path) {
                Ok(plan) => plans.push((path, plan)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(plans)
}

/// A warning from rule, catalog, or plan validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The rule, course, or record id (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn about(subject: &str, message: String) -> Self {
        Self {
            subject: Some(subject.to_string()),
            message,
        }
    }
}

/// Validate a requirement tree for inconsistent bounds and structure.
pub fn validate_rules(rules: &[RequirementNode]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for rule in rules {
        if !seen_ids.insert(rule.id.as_str()) {
            warnings.push(ValidationWarning::about(
                &rule.id,
                format!("duplicate requirement ID: {}", rule.id),
            ));
        }
        for node in std::iter::once(rule).chain(rule.children.iter()) {
            if node.min > node.max {
                warnings.push(ValidationWarning::about(
                    &node.id,
                    format!("minimum {} exceeds maximum {}", node.min, node.max),
                ));
            }
            if node.exact && node.min != node.max {
                warnings.push(ValidationWarning::about(
                    &node.id,
                    "marked exact but minimum and maximum differ".into(),
                ));
            }
        }
        for child in &rule.children {
            if !child.children.is_empty() {
                warnings.push(ValidationWarning::about(
                    &child.id,
                    "nested sub-requirements are ignored (one level supported)".into(),
                ));
            }
        }
    }

    warnings
}

/// Validate a catalog against the requirement tree.
pub fn validate_catalog(catalog: &Catalog, rules: &[RequirementNode]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for course in &catalog.courses {
        if !seen_ids.insert(course.id.as_str()) {
            warnings.push(ValidationWarning::about(
                &course.id,
                format!("duplicate course ID: {}", course.id),
            ));
        }

        match rules.iter().find(|r| r.id == course.group) {
            None => warnings.push(ValidationWarning::about(
                &course.id,
                format!(
                    "group '{}' matches no requirement, credits will not count",
                    course.group
                ),
            )),
            Some(rule) => {
                if let Some(sub_group) = &course.sub_group {
                    if !rule.children.iter().any(|c| &c.id == sub_group) {
                        warnings.push(ValidationWarning::about(
                            &course.id,
                            format!(
                                "sub-group '{}' matches no sub-requirement of {}",
                                sub_group, rule.id
                            ),
                        ));
                    }
                }
            }
        }

        if course.credits == 0 && !course.variable_credits {
            warnings.push(ValidationWarning::about(
                &course.id,
                "course has zero credits".into(),
            ));
        }
    }

    warnings
}

/// Validate a student plan against the catalog.
pub fn validate_plan(plan: &StudentPlan, catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_courses: HashMap<&str, &str> = HashMap::new();

    for record in &plan.records {
        if !seen_ids.insert(record.id.as_str()) {
            warnings.push(ValidationWarning::about(
                &record.id,
                format!("duplicate record ID: {}", record.id),
            ));
        }
        if let Some(first) = seen_courses.insert(&record.course_id, &record.id) {
            warnings.push(ValidationWarning::about(
                &record.id,
                format!(
                    "course '{}' is already planned in record {}, credits count twice",
                    record.course_id, first
                ),
            ));
        }

        let Some(course) = catalog.find(&record.course_id) else {
            warnings.push(ValidationWarning::about(
                &record.id,
                format!(
                    "references unknown course '{}', it will not be counted",
                    record.course_id
                ),
            ));
            continue;
        };

        if let Some(credits) = record.credit_override {
            if !course.variable_credits {
                warnings.push(ValidationWarning::about(
                    &record.id,
                    format!("credit override on fixed-credit course {}", course.code),
                ));
            }
            if let Some(max) = course.max_credits {
                if credits > max {
                    warnings.push(ValidationWarning::about(
                        &record.id,
                        format!(
                            "credit override {} exceeds course maximum of {}",
                            credits, max
                        ),
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::degree_rules;

    const CATALOG_TOML: &str = r#"
[[courses]]
id = "sws-theory"
code = "SWS-101"
title = "Formal Methods"
credits = 6
group = "A1"
sub_group = "S1"
frequency = "WS"
language = "en"

[[courses]]
id = "project"
code = "PRJ-900"
title = "Master's Project"
credits = 6
group = "A3"
variable_credits = true
max_credits = 9

[[courses]]
id = "legacy"
code = "OLD-1"
title = "Legacy Course"
credits = 5
group = "Z9"
area = "S1"
"#;

    const PLAN_TOML: &str = r#"
[profile]
student = "jdoe"
start_term = "WS"
start_year = 2025
focus = "security"

[[records]]
id = "r1"
course = "sws-theory"
status = "passed"
term = "WS"
year = 2025

[[records]]
id = "r2"
course = "project"
status = "in_progress"
term = "SS"
year = 2026
credits = 12
"#;

    #[test]
    fn parse_catalog_with_alias_and_defaults() {
        let catalog = parse_catalog_str(CATALOG_TOML, &PathBuf::from("catalog.toml")).unwrap();
        assert_eq!(catalog.courses.len(), 3);
        assert_eq!(catalog.courses[0].sub_group.as_deref(), Some("S1"));
        assert!(catalog.courses[1].variable_credits);
        assert_eq!(catalog.courses[2].sub_group.as_deref(), Some("S1"));
        assert!(catalog.courses[2].exam_type.is_none());
    }

    #[test]
    fn parse_plan_file() {
        let plan = parse_plan_str(PLAN_TOML, &PathBuf::from("plan.toml")).unwrap();
        assert_eq!(plan.profile.student, "jdoe");
        assert_eq!(plan.profile.focus.as_deref(), Some("security"));
        assert_eq!(plan.records.len(), 2);
        assert_eq!(plan.records[1].status, RecordStatus::InProgress);
        assert_eq!(
            plan.records[1].placement,
            TermPlacement::new(Term::Summer, 2026)
        );
        assert_eq!(plan.records[1].credit_override, Some(12));
    }

    #[test]
    fn plan_defaults_student_to_file_stem() {
        let toml = r#"
[[records]]
id = "r1"
course = "x"
term = "SS"
year = 2026
"#;
        let plan = parse_plan_str(toml, &PathBuf::from("plans/alice.toml")).unwrap();
        assert_eq!(plan.profile.student, "alice");
        assert_eq!(plan.profile.start, TermPlacement::new(Term::Winter, 2025));
        assert_eq!(plan.records[0].status, RecordStatus::Planned);
    }

    #[test]
    fn parse_plan_rejects_unknown_status() {
        let toml = r#"
[[records]]
id = "r1"
course = "x"
status = "dropped"
term = "WS"
year = 2025
"#;
        let err = parse_plan_str(toml, &PathBuf::from("p.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown status"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_catalog_str(bad, &PathBuf::from("bad.toml")).is_err());
        assert!(parse_plan_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn save_and_reload_plan() {
        let plan = parse_plan_str(PLAN_TOML, &PathBuf::from("plan.toml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/plan.toml");

        save_plan(&plan, &path).unwrap();
        let reloaded = parse_plan(&path).unwrap();
        assert_eq!(reloaded, plan);
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), PLAN_TOML).unwrap();
        std::fs::write(dir.path().join("b.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let plans = load_plan_directory(dir.path()).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].1.profile.student, "jdoe");
    }

    #[test]
    fn load_directory_rejects_duplicate_students() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
            std::fs::write(dir.path().join(sub).join("jdoe.toml"), "").unwrap();
        }

        let err = load_plan_directory(dir.path()).unwrap_err().to_string();
        assert!(err.contains("duplicate student 'jdoe'"), "{err}");
        assert!(err.contains(&dir.path().join("a/jdoe.toml").display().to_string()));
        assert!(err.contains(&dir.path().join("b/jdoe.toml").display().to_string()));
    }

    #[test]
    fn shipped_rules_are_valid() {
        assert!(validate_rules(degree_rules()).is_empty());
    }

    #[test]
    fn validate_rules_flags_bad_bounds_and_nesting() {
        let rules = vec![
            RequirementNode::new("X", "X", 10, 5).with_children(vec![
                RequirementNode::new("Y", "Y", 1, 2)
                    .with_children(vec![RequirementNode::new("Z", "Z", 0, 1)]),
            ]),
            RequirementNode::new("X", "Again", 0, 1),
        ];
        let warnings = validate_rules(&rules);
        assert!(warnings.iter().any(|w| w.message.contains("exceeds maximum")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("nested")));
    }

    #[test]
    fn validate_catalog_flags_unknown_groups() {
        let catalog = parse_catalog_str(CATALOG_TOML, &PathBuf::from("c.toml")).unwrap();
        let warnings = validate_catalog(&catalog, degree_rules());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject.as_deref(), Some("legacy"));
        assert!(warnings[0].message.contains("Z9"));
    }

    #[test]
    fn validate_catalog_flags_unknown_sub_group() {
        let catalog = Catalog::new(vec![
            Course::new("m1", "X", "X", 6, "A1").with_sub_group("S7"),
            Course::new("m1", "Y", "Y", 0, "A2"),
        ]);
        let warnings = validate_catalog(&catalog, degree_rules());
        assert!(warnings.iter().any(|w| w.message.contains("S7")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("zero credits")));
    }

    #[test]
    fn validate_catalog_flags_sub_group_on_flat_requirement() {
        let catalog = Catalog::new(vec![
            Course::new("dom", "D-1", "Domain", 6, "A2").with_sub_group("S1")
        ]);
        let warnings = validate_catalog(&catalog, degree_rules());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            "sub-group 'S1' matches no sub-requirement of A2"
        );
    }

    #[test]
    fn validate_plan_flags_course_planned_twice() {
        let catalog = parse_catalog_str(CATALOG_TOML, &PathBuf::from("c.toml")).unwrap();
        let mut plan = parse_plan_str(PLAN_TOML, &PathBuf::from("p.toml")).unwrap();
        plan.records
            .push(CourseRecord::new("r3", "sws-theory", TermPlacement::default()));

        let warnings = validate_plan(&plan, &catalog);
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        let dup = warnings
            .iter()
            .find(|w| w.subject.as_deref() == Some("r3"))
            .unwrap();
        assert_eq!(
            dup.message,
            "course 'sws-theory' is already planned in record r1, credits count twice"
        );
    }

    #[test]
    fn validate_plan_checks_references_and_overrides() {
        let catalog = parse_catalog_str(CATALOG_TOML, &PathBuf::from("c.toml")).unwrap();
        let mut plan = parse_plan_str(PLAN_TOML, &PathBuf::from("p.toml")).unwrap();
        plan.records.push(CourseRecord::new("r1", "ghost", TermPlacement::default()));
        plan.records[0].credit_override = Some(3);

        let warnings = validate_plan(&plan, &catalog);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("fixed-credit")));
        assert!(messages.iter().any(|m| m.contains("exceeds course maximum of 9")));
        assert!(messages.iter().any(|m| m.contains("duplicate record ID")));
        assert!(messages.iter().any(|m| m.contains("unknown course 'ghost'")));
    }
}
