//! The `degreetrack evaluate` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use degreetrack_core::alerts::Severity;
use degreetrack_core::engine::{EngineConfig, PlanEngine, ProgressReporter};
use degreetrack_core::parser;
use degreetrack_core::report::PlanReport;
use degreetrack_core::store::{FileStore, InMemoryStore};
use degreetrack_core::traits::RecordStore;
use degreetrack_report::html::write_html_report;
use degreetrack_report::markdown::write_markdown_report;

use super::DataArgs;

/// Console progress reporter for batch runs.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_student_start(&self, student: &str) {
        eprintln!("  Evaluating: {student}");
    }

    fn on_student_complete(&self, report: &PlanReport) {
        eprintln!(
            "  Done: {} ({} / {} credits passed, {} alert(s))",
            report.profile.student,
            report.summary.passed,
            report.summary.target,
            report.alerts.len()
        );
    }

    fn on_student_error(&self, student: &str, error: &str) {
        eprintln!("  ERROR: {student}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} evaluated, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(data: DataArgs, format: String, output: Option<PathBuf>) -> Result<()> {
    let paths = data.resolve()?;
    let parallelism = paths.config.parallelism;
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let formats = parse_formats(&format)?;
    let output = output.unwrap_or_else(|| paths.config.output_dir.clone());

    let reports = if paths.plan.is_dir() {
        let catalog = parser::parse_catalog(&paths.catalog)?;
        let plans = parser::load_plan_directory(&paths.plan)?;
        anyhow::ensure!(
            !plans.is_empty(),
            "no plans found in {}",
            paths.plan.display()
        );

        let store = InMemoryStore::new(catalog);
        let mut students = Vec::new();
        for (_, plan) in plans {
            students.push(plan.profile.student.clone());
            store.insert_plan(plan).await;
        }

        eprintln!(
            "degreetrack v{} — Evaluating {} plans",
            env!("CARGO_PKG_VERSION"),
            students.len()
        );
        let engine = PlanEngine::new(Arc::new(store), EngineConfig { parallelism });
        let batch = engine.evaluate_all(&students, &ConsoleReporter).await;
        print_batch_summary(&batch.reports);
        batch.reports
    } else {
        let store = FileStore::open(&paths.catalog, &paths.plan)?;
        let student = store
            .students()
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("no student in {}", paths.plan.display()))?;
        let engine = PlanEngine::new(Arc::new(store), EngineConfig { parallelism });
        let report = engine.evaluate_student(&student).await?;
        print_report(&report);
        vec![report]
    };

    for report in &reports {
        write_outputs(report, &formats, &output)?;
    }

    Ok(())
}

fn parse_formats(format: &str) -> Result<Vec<&str>> {
    if format == "all" {
        return Ok(vec!["json", "markdown", "html"]);
    }
    let formats: Vec<&str> = format.split(',').map(str::trim).collect();
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "text" | "json" | "markdown" | "html"),
            "unknown format: {fmt} (expected text, json, markdown, html, or all)"
        );
    }
    Ok(formats)
}

/// File stem for a student's report files; ids that could escape the output
/// directory are rejected.
fn report_stem(student: &str) -> Result<&str> {
    anyhow::ensure!(
        !student.is_empty()
            && student != "."
            && student != ".."
            && !student.contains(['/', '\\', ':']),
        "student id '{student}' cannot be used as a report file name"
    );
    Ok(student)
}

fn write_outputs(report: &PlanReport, formats: &[&str], output: &Path) -> Result<()> {
    let stem = report_stem(&report.profile.student)?;
    for fmt in formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("{stem}.md"));
                write_markdown_report(report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {}
        }
    }
    Ok(())
}

fn print_report(report: &PlanReport) {
    println!(
        "Degree plan: {} (start {})",
        report.profile.student,
        report.profile.start.label()
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Requirement",
        "Range",
        "Passed",
        "Planned",
        "Total",
        "Status",
    ]);
    for group in &report.groups {
        let rows = std::iter::once((group, ""))
            .chain(group.children.iter().map(|child| (child, "  ↳ ")));
        for (node, indent) in rows {
            let range = if node.exact {
                node.min.to_string()
            } else {
                format!("{}–{}", node.min, node.max)
            };
            table.add_row(vec![
                Cell::new(format!("{indent}{} ({})", node.label, node.id)),
                Cell::new(range),
                Cell::new(node.passed),
                Cell::new(node.planned),
                Cell::new(node.total),
                Cell::new(node.status.label()),
            ]);
        }
    }
    println!("{table}");

    let summary = &report.summary;
    println!(
        "\nProgress: {} / {} credits passed, {} planned, {} remaining",
        summary.passed, summary.target, summary.planned, summary.remaining
    );

    if !report.alerts.is_empty() {
        println!("\nAlerts:");
        for alert in &report.alerts {
            let tag = match alert.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN",
                Severity::Info => "INFO",
            };
            println!("  [{tag}] {}", alert.message);
        }
    }

    if !report.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &report.suggestions {
            println!("  - {suggestion}");
        }
    }
}

fn print_batch_summary(reports: &[PlanReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Passed",
        "Planned",
        "Remaining",
        "Errors",
        "Warnings",
    ]);

    for report in reports {
        let count = |severity: Severity| {
            report
                .alerts
                .iter()
                .filter(|a| a.severity == severity)
                .count()
        };
        table.add_row(vec![
            Cell::new(&report.profile.student),
            Cell::new(report.summary.passed),
            Cell::new(report.summary.planned),
            Cell::new(report.summary.remaining),
            Cell::new(count(Severity::Error)),
            Cell::new(count(Severity::Warning)),
        ]);
    }

    println!("{table}");
}
