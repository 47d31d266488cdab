//! Markdown report output, for pasting into issues, wikis, or emails.

use std::path::Path;

use anyhow::{Context, Result};

use degreetrack_core::alerts::Severity;
use degreetrack_core::classify::GroupStatus;
use degreetrack_core::report::{checklist_mark, CourseLine, PlanReport};

/// Generate a markdown document from a plan report.
pub fn generate_markdown(report: &PlanReport) -> String {
    let mut md = String::new();
    let summary = &report.summary;

    md.push_str(&format!("# Degree plan: {}\n\n", report.profile.student));
    md.push_str(&format!(
        "**Start:** {} | **Focus:** {} | **Generated:** {}\n\n",
        report.profile.start.label(),
        report.profile.focus.as_deref().unwrap_or("-"),
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!(
        "**Summary:** {} / {} credits passed, {} planned, {} remaining\n\n",
        summary.passed, summary.target, summary.planned, summary.remaining
    ));

    md.push_str("## Requirements\n\n");
    md.push_str("| Requirement | Range | Passed | Planned | Status |\n");
    md.push_str("|-------------|-------|--------|---------|--------|\n");
    for group in &report.groups {
        md.push_str(&checklist_line(group, ""));
        for child in &group.children {
            md.push_str(&checklist_line(child, "↳ "));
        }
    }
    md.push('\n');

    if !report.alerts.is_empty() {
        md.push_str("## Alerts\n\n");
        for alert in &report.alerts {
            let marker = match alert.severity {
                Severity::Error => "❌",
                Severity::Warning => "⚠️",
                Severity::Info => "ℹ️",
            };
            md.push_str(&format!("- {} {}\n", marker, alert.message));
        }
        md.push('\n');
    }

    if !report.suggestions.is_empty() {
        md.push_str("## Suggestions\n\n");
        for suggestion in &report.suggestions {
            md.push_str(&format!("- {suggestion}\n"));
        }
        md.push('\n');
    }

    md.push_str(&course_section("Passed courses", &report.passed_courses));
    md.push_str(&course_section("Planned courses", &report.planned_courses));

    md
}

/// Write a markdown report to a file.
pub fn write_markdown_report(report: &PlanReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}

/// Escape pipes so free text cannot break table rows.
fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn checklist_line(group: &GroupStatus, prefix: &str) -> String {
    let range = if group.exact {
        group.min.to_string()
    } else {
        format!("{}–{}", group.min, group.max)
    };
    format!(
        "| {}{} ({}) | {} | {} | {} | {} |\n",
        prefix,
        cell(&group.label),
        cell(&group.id),
        range,
        group.passed,
        group.planned,
        checklist_mark(group.status)
    )
}

fn course_section(title: &str, lines: &[CourseLine]) -> String {
    let mut md = format!("## {title}\n\n");
    if lines.is_empty() {
        md.push_str("_None._\n\n");
        return md;
    }
    md.push_str("| Code | Title | Credits | Group | Semester | Status |\n");
    md.push_str("|------|-------|---------|-------|----------|--------|\n");
    for line in lines {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&line.code),
            cell(&line.title),
            line.credits,
            cell(&line.group),
            cell(&line.semester),
            line.status
        ));
    }
    md.push('\n');
    md
}
