//! Core data model types for degreetrack.
//!
//! Courses come from the catalog, course records are a student's plan
//! entries, and a resolved record is the two joined together, which is the
//! shape the evaluation engine consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::semester::TermPlacement;

/// A course offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier.
    pub id: String,
    /// Short course code (e.g. "SWS-101").
    pub code: String,
    /// Human-readable title.
    pub title: String,
    /// Nominal credit value.
    pub credits: u32,
    /// Requirement group this course counts toward (e.g. "A1").
    pub group: String,
    /// Optional sub-group within the requirement group (e.g. "S2").
    #[serde(default)]
    pub sub_group: Option<String>,
    /// Whether the credit value may be overridden per student.
    #[serde(default)]
    pub variable_credits: bool,
    /// Upper bound for overridden credits on variable-credit courses.
    #[serde(default)]
    pub max_credits: Option<u32>,
    /// How often the course is offered (e.g. "WS", "SS", "every semester").
    #[serde(default)]
    pub frequency: String,
    /// Teaching language.
    #[serde(default)]
    pub language: String,
    /// Kind of examination.
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Course {
    /// Minimal course with empty descriptive metadata.
    pub fn new(id: &str, code: &str, title: &str, credits: u32, group: &str) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            title: title.into(),
            credits,
            group: group.into(),
            sub_group: None,
            variable_credits: false,
            max_credits: None,
            frequency: String::new(),
            language: String::new(),
            exam_type: None,
            description: None,
        }
    }

    pub fn with_sub_group(mut self, sub_group: &str) -> Self {
        self.sub_group = Some(sub_group.into());
        self
    }
}

/// Progress state of a course in a student's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Planned,
    InProgress,
    Passed,
    Failed,
}

impl RecordStatus {
    /// Statuses counted as earned credits.
    pub const EARNED: &'static [RecordStatus] = &[RecordStatus::Passed];
    /// Statuses counted as credits still on the way.
    pub const PENDING: &'static [RecordStatus] = &[RecordStatus::Planned, RecordStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Planned => "planned",
            RecordStatus::InProgress => "in_progress",
            RecordStatus::Passed => "passed",
            RecordStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(RecordStatus::Planned),
            "in_progress" | "in-progress" | "inprogress" => Ok(RecordStatus::InProgress),
            "passed" => Ok(RecordStatus::Passed),
            "failed" => Ok(RecordStatus::Failed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One entry of a student's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Unique record identifier.
    pub id: String,
    /// Catalog id of the referenced course.
    pub course_id: String,
    pub status: RecordStatus,
    /// Semester the course is (or was) taken in.
    pub placement: TermPlacement,
    /// Credit value replacing the course's nominal one.
    #[serde(default)]
    pub credit_override: Option<u32>,
}

impl CourseRecord {
    /// A freshly added record: status starts as planned, no override.
    pub fn new(id: &str, course_id: &str, placement: TermPlacement) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            status: RecordStatus::Planned,
            placement,
            credit_override: None,
        }
    }
}

/// A course record joined with its course definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub record: CourseRecord,
    pub course: Course,
}

impl ResolvedRecord {
    /// Override value if present, else the course's nominal credits.
    pub fn effective_credits(&self) -> u32 {
        self.record.credit_override.unwrap_or(self.course.credits)
    }

    pub fn status(&self) -> RecordStatus {
        self.record.status
    }
}

/// Student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Student identifier.
    pub student: String,
    /// First semester of study.
    #[serde(default)]
    pub start: TermPlacement,
    /// Optional focus area tag.
    #[serde(default)]
    pub focus: Option<String>,
}

impl Profile {
    pub fn new(student: &str) -> Self {
        Self {
            student: student.into(),
            start: TermPlacement::default(),
            focus: None,
        }
    }
}

/// A student's profile together with every record of their plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPlan {
    pub profile: Profile,
    #[serde(default)]
    pub records: Vec<CourseRecord>,
}

impl StudentPlan {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            records: Vec::new(),
        }
    }

    pub fn find_record_mut(&mut self, id: &str) -> Option<&mut CourseRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }
}

/// The course catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Look up a course by id.
    pub fn find(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Join records with their course definitions.
    ///
    /// Records pointing at a course the catalog does not contain are dropped,
    /// so they simply do not count toward any requirement.
    pub fn resolve(&self, records: &[CourseRecord]) -> Vec<ResolvedRecord> {
        let index: HashMap<&str, &Course> =
            self.courses.iter().map(|c| (c.id.as_str(), c)).collect();

        records
            .iter()
            .filter_map(|record| match index.get(record.course_id.as_str()) {
                Some(course) => Some(ResolvedRecord {
                    record: record.clone(),
                    course: (*course).clone(),
                }),
                None => {
                    tracing::warn!(
                        "record '{}' references unknown course '{}', not counted",
                        record.id,
                        record.course_id
                    );
                    None
                }
            })
            .collect()
    }

    /// Courses whose title or code contains `query` (case-insensitive),
    /// optionally restricted to one requirement group, in [`Catalog::sorted`]
    /// order.
    pub fn search(&self, query: &str, group: Option<&str>) -> Vec<&Course> {
        let needle = query.to_lowercase();
        self.sorted()
            .into_iter()
            .filter(|c| {
                c.title.to_lowercase().contains(&needle) || c.code.to_lowercase().contains(&needle)
            })
            .filter(|c| group.map_or(true, |g| c.group == g))
            .collect()
    }

    /// Courses ordered by group, sub-group, then title.
    pub fn sorted(&self) -> Vec<&Course> {
        let mut courses: Vec<&Course> = self.courses.iter().collect();
        courses.sort_by(|a, b| {
            a.group
                .cmp(&b.group)
                .then_with(|| a.sub_group.cmp(&b.sub_group))
                .then_with(|| a.title.cmp(&b.title))
        });
        courses
    }
}
