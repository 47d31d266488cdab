//! Alert generation from a classified requirement tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::{ComplianceStatus, GroupStatus};
use crate::rules::{SEMINAR_PROJECT_ID, THESIS_ID};

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A required minimum is unmet.
    Error,
    /// A maximum is exceeded.
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A rendered alert about one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    /// Top-level requirement the alert belongs to.
    #[serde(default)]
    pub requirement: Option<String>,
}

impl Alert {
    pub fn error(requirement: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
            requirement: Some(requirement.into()),
        }
    }

    pub fn warning(requirement: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            requirement: Some(requirement.into()),
        }
    }
}

/// Alerts for every violated requirement, in tree order, followed by the
/// mandatory-component alerts.
///
/// A parent's alerts come before its children's. Child alerts are tagged
/// with the parent's id.
pub fn generate_alerts(groups: &[GroupStatus]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for group in groups {
        let name = format!("{} ({})", group.label, group.id);
        alerts.extend(node_alert(group, &group.id, &name));

        for child in &group.children {
            let name = format!("{}/{}", group.id, child.label);
            alerts.extend(node_alert(child, &group.id, &name));
        }
    }

    alerts.extend(mandatory_component_alerts(groups));
    alerts
}

fn node_alert(node: &GroupStatus, requirement: &str, name: &str) -> Option<Alert> {
    match node.status {
        ComplianceStatus::BelowMin => Some(Alert::error(
            requirement,
            format!(
                "{name}: {} credits passed, need at least {}.",
                node.passed, node.min
            ),
        )),
        ComplianceStatus::AboveMax => Some(Alert::warning(
            requirement,
            format!(
                "{name}: {} credits exceeds maximum of {}.",
                node.total, node.max
            ),
        )),
        _ => None,
    }
}

/// Alerts for components the seminar/project and thesis requirements must
/// contain but the rule tree does not model.
///
/// The seminar (3 credits) and project (6 credits) checks are independent,
/// so with fewer than 3 passed credits both fire.
pub fn mandatory_component_alerts(groups: &[GroupStatus]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(seminar) = groups.iter().find(|g| g.id == SEMINAR_PROJECT_ID) {
        if seminar.passed < 9 {
            if seminar.passed < 3 {
                alerts.push(Alert::error(
                    SEMINAR_PROJECT_ID,
                    "Missing: Master's Seminar (3 credits required).".into(),
                ));
            }
            alerts.push(Alert::error(
                SEMINAR_PROJECT_ID,
                "Missing: Master's Project (6 credits required).".into(),
            ));
        }
    }

    if let Some(thesis) = groups.iter().find(|g| g.id == THESIS_ID) {
        if thesis.passed < 30 {
            alerts.push(Alert::error(
                THESIS_ID,
                "Missing: Master's Thesis (30 credits required).".into(),
            ));
        }
    }

    alerts
}
