//! Remediation hints for requirements that are short on passed credits.

use crate::classify::GroupStatus;

/// One suggestion per node whose passed credits are below its minimum,
/// parent before children.
pub fn generate_suggestions(groups: &[GroupStatus]) -> Vec<String> {
    let mut suggestions = Vec::new();

    for group in groups {
        if group.passed < group.min {
            suggestions.push(format!(
                "Add {} more credits to {} ({}).",
                group.shortfall(),
                group.label,
                group.id
            ));
        }
        for child in &group.children {
            if child.passed < child.min {
                suggestions.push(format!(
                    "Add {} more credits to {} in {}.",
                    child.shortfall(),
                    child.label,
                    group.id
                ));
            }
        }
    }

    suggestions
}
