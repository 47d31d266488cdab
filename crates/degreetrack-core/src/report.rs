//! Plan report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alerts::Alert;
use crate::classify::{ComplianceStatus, GroupStatus};
use crate::engine::{evaluate, ProgressSummary};
use crate::model::{Profile, RecordStatus, ResolvedRecord};
use crate::rules::RequirementNode;

/// A complete, exportable evaluation of one student's plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
    /// Program-wide credit totals.
    pub summary: ProgressSummary,
    /// Classified requirement tree.
    pub groups: Vec<GroupStatus>,
    pub alerts: Vec<Alert>,
    pub suggestions: Vec<String>,
    /// Courses already passed.
    pub passed_courses: Vec<CourseLine>,
    /// Courses planned or in progress.
    pub planned_courses: Vec<CourseLine>,
}

/// One course row of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLine {
    pub code: String,
    pub title: String,
    /// Effective credits (override applied).
    pub credits: u32,
    pub group: String,
    pub status: RecordStatus,
    /// Semester label, e.g. "WS 2025/26".
    pub semester: String,
}

impl CourseLine {
    fn from_record(record: &ResolvedRecord) -> Self {
        Self {
            code: record.course.code.clone(),
            title: record.course.title.clone(),
            credits: record.effective_credits(),
            group: record.course.group.clone(),
            status: record.status(),
            semester: record.record.placement.label(),
        }
    }
}

impl PlanReport {
    /// Evaluate `records` against `rules` and bundle everything for export.
    pub fn build(profile: Profile, rules: &[RequirementNode], records: &[ResolvedRecord]) -> Self {
        let evaluation = evaluate(rules, records);

        let lines = |statuses: &[RecordStatus]| -> Vec<CourseLine> {
            records
                .iter()
                .filter(|r| statuses.contains(&r.status()))
                .map(CourseLine::from_record)
                .collect()
        };

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile,
            summary: evaluation.summary,
            groups: evaluation.groups,
            alerts: evaluation.alerts,
            suggestions: evaluation.suggestions,
            passed_courses: lines(RecordStatus::EARNED),
            planned_courses: lines(RecordStatus::PENDING),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: PlanReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

/// Checklist mark for a requirement in printed reports.
pub fn checklist_mark(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Complete => "✓",
        ComplianceStatus::AboveMax => "⚠ Over",
        _ => "✗ Incomplete",
    }
}
