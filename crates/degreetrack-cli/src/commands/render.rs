//! The `degreetrack render` command.

use std::path::PathBuf;

use anyhow::Result;

use degreetrack_core::report::PlanReport;
use degreetrack_report::html::write_html_report;
use degreetrack_report::markdown::write_markdown_report;

pub fn execute(report_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = PlanReport::load_json(&report_path)?;

    match format.as_str() {
        "html" => {
            let path = output.unwrap_or_else(|| report_path.with_extension("html"));
            write_html_report(&report, &path)?;
            println!("HTML report: {}", path.display());
        }
        "markdown" | "md" => {
            let path = output.unwrap_or_else(|| report_path.with_extension("md"));
            write_markdown_report(&report, &path)?;
            println!("Markdown report: {}", path.display());
        }
        other => anyhow::bail!("unknown format: {other} (expected html or markdown)"),
    }

    Ok(())
}
