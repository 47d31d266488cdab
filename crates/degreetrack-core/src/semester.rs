//! Semester placement and the planner's per-semester view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ResolvedRecord;

/// Number of semesters shown by the planner when nothing else is configured.
pub const DEFAULT_SEMESTER_COUNT: usize = 8;

/// Academic term of a semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Winter semester, spans the turn of the year.
    #[serde(rename = "WS")]
    Winter,
    /// Summer semester.
    #[serde(rename = "SS")]
    Summer,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Winter => write!(f, "WS"),
            Term::Summer => write!(f, "SS"),
        }
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ws" | "winter" => Ok(Term::Winter),
            "ss" | "summer" => Ok(Term::Summer),
            other => Err(format!("unknown term: {other}")),
        }
    }
}

/// A concrete semester: term plus the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermPlacement {
    pub term: Term,
    pub year: i32,
}

impl TermPlacement {
    pub fn new(term: Term, year: i32) -> Self {
        Self { term, year }
    }

    /// Stable key, e.g. `WS 2025`.
    pub fn key(&self) -> String {
        format!("{} {}", self.term, self.year)
    }

    /// Display label, e.g. `WS 2025/26` or `SS 2026`.
    pub fn label(&self) -> String {
        match self.term {
            Term::Winter => format!("WS {}/{:02}", self.year, (self.year + 1).rem_euclid(100)),
            Term::Summer => format!("SS {}", self.year),
        }
    }

    /// The semester that follows this one.
    ///
    /// A winter semester is followed by the summer semester of the next
    /// calendar year; a summer semester by the winter semester of the same year.
    pub fn next(&self) -> Self {
        match self.term {
            Term::Winter => Self::new(Term::Summer, self.year + 1),
            Term::Summer => Self::new(Term::Winter, self.year),
        }
    }
}

impl Default for TermPlacement {
    fn default() -> Self {
        Self::new(Term::Winter, 2025)
    }
}

impl fmt::Display for TermPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// `count` consecutive semesters beginning with `start`.
pub fn semester_sequence(start: TermPlacement, count: usize) -> Vec<TermPlacement> {
    std::iter::successors(Some(start), |s| Some(s.next()))
        .take(count)
        .collect()
}

/// Credits a single semester can hold before it counts as a high workload.
pub const MAX_SEMESTER_CREDITS: u32 = 30;

/// Records placed in one semester.
#[derive(Debug, Clone)]
pub struct SemesterBucket<'a> {
    pub placement: TermPlacement,
    pub records: Vec<&'a ResolvedRecord>,
}

impl SemesterBucket<'_> {
    /// Sum of effective credits of every record in the bucket, regardless of status.
    pub fn credits(&self) -> u32 {
        self.records.iter().map(|r| r.effective_credits()).sum()
    }

    /// More than [`MAX_SEMESTER_CREDITS`] placed in this semester.
    pub fn is_overloaded(&self) -> bool {
        self.credits() > MAX_SEMESTER_CREDITS
    }
}

/// Distribute records over the given semesters.
///
/// Every semester in `semesters` gets a bucket (possibly empty), in order.
/// Records placed outside that window get extra buckets appended in the order
/// their placement is first seen.
pub fn group_by_semester<'a>(
    records: &'a [ResolvedRecord],
    semesters: &[TermPlacement],
) -> Vec<SemesterBucket<'a>> {
    let mut buckets: Vec<SemesterBucket<'a>> = semesters
        .iter()
        .map(|&placement| SemesterBucket {
            placement,
            records: Vec::new(),
        })
        .collect();

    for record in records {
        let placement = record.record.placement;
        match buckets.iter_mut().find(|b| b.placement == placement) {
            Some(bucket) => bucket.records.push(record),
            None => buckets.push(SemesterBucket {
                placement,
                records: vec![record],
            }),
        }
    }

    buckets
}
