//! HTML report generator.
//!
//! Produces a self-contained, printable HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use degreetrack_core::alerts::Severity;
use degreetrack_core::classify::{ComplianceStatus, GroupStatus};
use degreetrack_core::report::{checklist_mark, CourseLine, PlanReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a plan report.
pub fn generate_html(report: &PlanReport) -> String {
    let mut html = String::new();
    let student = html_escape(&report.profile.student);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>Degree plan of {student}</title>\n"));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Degree plan</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Student: <strong>{}</strong> | Start: {} | Focus: {} | Generated {}</p>\n",
        student,
        html_escape(&report.profile.start.label()),
        html_escape(report.profile.focus.as_deref().unwrap_or("-")),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Credit summary
    let summary = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Passed</th><th>Planned</th><th>Remaining</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{} / {}</td><td>{}</td><td>{}</td></tr></tbody>\n",
        summary.passed, summary.target, summary.planned, summary.remaining
    ));
    html.push_str("</table>\n");
    html.push_str(&progress_bar(summary.passed, summary.planned, summary.target));
    html.push_str("</section>\n");

    // Requirements checklist
    html.push_str("<section class=\"checklist\">\n");
    html.push_str("<h2>Requirements</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Requirement</th><th>Range</th><th>Passed</th><th>Planned</th><th>Status</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for group in &report.groups {
        html.push_str(&checklist_row(group, false));
        for child in &group.children {
            html.push_str(&checklist_row(child, true));
        }
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Alerts and suggestions
    if !report.alerts.is_empty() || !report.suggestions.is_empty() {
        html.push_str("<section class=\"alerts\">\n");
        html.push_str("<h2>Alerts</h2>\n<ul>\n");
        for alert in &report.alerts {
            let class = match alert.severity {
                Severity::Error => "fail",
                Severity::Warning => "warn",
                Severity::Info => "info",
            };
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>\n",
                class,
                html_escape(&alert.message)
            ));
        }
        html.push_str("</ul>\n");
        if !report.suggestions.is_empty() {
            html.push_str("<h3>Suggestions</h3>\n<ul>\n");
            for suggestion in &report.suggestions {
                html.push_str(&format!("<li>{}</li>\n", html_escape(suggestion)));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</section>\n");
    }

    // Course tables
    html.push_str(&course_table(
        "passed",
        "Passed courses",
        &report.passed_courses,
    ));
    html.push_str(&course_table(
        "planned",
        "Planned courses",
        &report.planned_courses,
    ));

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &PlanReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn checklist_row(group: &GroupStatus, nested: bool) -> String {
    let class = match group.status {
        ComplianceStatus::Complete => "pass",
        ComplianceStatus::AboveMax => "warn",
        _ => "fail",
    };
    let range = if group.exact {
        format!("{}", group.min)
    } else {
        format!("{}–{}", group.min, group.max)
    };
    format!(
        "<tr{}><td>{}{} ({})</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
        if nested { " class=\"child\"" } else { "" },
        if nested { "↳ " } else { "" },
        html_escape(&group.label),
        html_escape(&group.id),
        range,
        group.passed,
        group.planned,
        class,
        checklist_mark(group.status),
    )
}

fn course_table(id: &str, title: &str, lines: &[CourseLine]) -> String {
    let mut html = format!("<section class=\"courses\">\n<h2>{title}</h2>\n");
    if lines.is_empty() {
        html.push_str("<p class=\"meta\">None.</p>\n</section>\n");
        return html;
    }

    html.push_str(&format!("<table class=\"courses-table\" id=\"{id}\">\n"));
    html.push_str(&format!(
        "<thead><tr><th onclick=\"sortTable('{id}', 0)\">Code</th><th onclick=\"sortTable('{id}', 1)\">Title</th><th onclick=\"sortTable('{id}', 2)\">Credits</th><th onclick=\"sortTable('{id}', 3)\">Group</th><th onclick=\"sortTable('{id}', 4)\">Semester</th><th>Status</th></tr></thead>\n"
    ));
    html.push_str("<tbody>\n");
    for line in lines {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&line.code),
            html_escape(&line.title),
            line.credits,
            html_escape(&line.group),
            html_escape(&line.semester),
            line.status,
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");
    html
}

fn progress_bar(passed: u32, planned: u32, target: u32) -> String {
    let width = 600;
    let height = 24;
    let scale = |credits: u32| (credits.min(target) as usize * width) / target.max(1) as usize;
    let passed_width = scale(passed);
    let planned_width = scale(passed + planned) - passed_width;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width,
        height + 20
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"#e5e7eb\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{passed_width}\" height=\"{height}\" fill=\"#22c55e\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"{passed_width}\" y=\"0\" width=\"{planned_width}\" height=\"{height}\" fill=\"#eab308\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"0\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">{passed} passed, {planned} planned of {target} credits</text>\n",
        height + 16
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --warn: #fef3c7; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --warn: #78350f; }
}
@media print {
  :root { --bg: #fff; --fg: #000; }
  details, script { display: none; }
  section { page-break-inside: avoid; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
tr.child td:first-child { padding-left: 2rem; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.warn { background: var(--warn); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(id, col) {
  const table = document.getElementById(id);
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
