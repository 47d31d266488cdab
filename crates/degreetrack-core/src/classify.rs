//! Requirement status classification.
//!
//! Each requirement node gets three credit totals and one of five statuses.
//! Children are evaluated with the same rules, scoped by sub-group, and are
//! never reconciled against their parent's totals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::group_credits;
use crate::model::{RecordStatus, ResolvedRecord};
use crate::rules::RequirementNode;

/// Compliance status of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Ok,
    Complete,
    InProgress,
    BelowMin,
    AboveMax,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Ok => "ok",
            ComplianceStatus::Complete => "complete",
            ComplianceStatus::InProgress => "in_progress",
            ComplianceStatus::BelowMin => "below_min",
            ComplianceStatus::AboveMax => "above_max",
        }
    }

    /// Short badge text for tables.
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Ok => "On Track",
            ComplianceStatus::Complete => "Complete",
            ComplianceStatus::InProgress => "In Progress",
            ComplianceStatus::BelowMin => "Below Min",
            ComplianceStatus::AboveMax => "Over Max",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a requirement from its credit totals.
///
/// The checks run in a fixed order and later ones win: the over-max check
/// always has the final say, even when `passed` alone is still below `min`.
pub fn classify(passed: u32, total: u32, min: u32, max: u32) -> ComplianceStatus {
    let mut status = ComplianceStatus::Ok;

    if passed >= min && passed <= max {
        status = ComplianceStatus::Complete;
    } else if total >= min && passed < min {
        status = ComplianceStatus::InProgress;
    } else if passed < min && total < min {
        status = ComplianceStatus::BelowMin;
    }

    if passed > max || total > max {
        status = ComplianceStatus::AboveMax;
    }

    status
}

/// Evaluated state of one requirement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatus {
    pub id: String,
    pub label: String,
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub exact: bool,
    /// Credits from passed courses.
    pub passed: u32,
    /// Credits from planned and in-progress courses.
    pub planned: u32,
    /// `passed + planned`.
    pub total: u32,
    pub status: ComplianceStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GroupStatus>,
}

impl GroupStatus {
    fn evaluate(node: &RequirementNode, passed: u32, planned: u32) -> Self {
        let total = passed + planned;
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            min: node.min,
            max: node.max,
            exact: node.exact,
            passed,
            planned,
            total,
            status: classify(passed, total, node.min, node.max),
            children: Vec::new(),
        }
    }

    /// Credits still needed to reach the minimum from passed courses alone.
    pub fn shortfall(&self) -> u32 {
        self.min.saturating_sub(self.passed)
    }
}

/// Evaluate every requirement in `rules` against the student's records.
///
/// Top-level nodes aggregate by group; children aggregate by the parent's
/// group plus their own id as sub-group.
pub fn compute_group_statuses(
    rules: &[RequirementNode],
    records: &[ResolvedRecord],
) -> Vec<GroupStatus> {
    rules
        .iter()
        .map(|rule| {
            let passed = group_credits(records, &rule.id, None, RecordStatus::EARNED);
            let planned = group_credits(records, &rule.id, None, RecordStatus::PENDING);
            let mut group = GroupStatus::evaluate(rule, passed, planned);

            group.children = rule
                .children
                .iter()
                .map(|child| {
                    let passed = group_credits(
                        records,
                        &rule.id,
                        Some(child.id.as_str()),
                        RecordStatus::EARNED,
                    );
                    let planned = group_credits(
                        records,
                        &rule.id,
                        Some(child.id.as_str()),
                        RecordStatus::PENDING,
                    );
                    GroupStatus::evaluate(child, passed, planned)
                })
                .collect();

            tracing::debug!(
                group = %group.id,
                passed = group.passed,
                planned = group.planned,
                status = %group.status,
                "classified requirement"
            );
            group
        })
        .collect()
}
