//! The `degreetrack validate` command.

use anyhow::Result;

use degreetrack_core::parser::{self, ValidationWarning};
use degreetrack_core::rules::degree_rules;

use super::DataArgs;

pub fn execute(data: DataArgs) -> Result<()> {
    let paths = data.resolve()?;
    let mut total_warnings = 0;

    println!("Rules: {} requirement groups", degree_rules().len());
    total_warnings += print_warnings(&parser::validate_rules(degree_rules()));

    let catalog = parser::parse_catalog(&paths.catalog)?;
    println!(
        "Catalog: {} ({} courses)",
        paths.catalog.display(),
        catalog.courses.len()
    );
    total_warnings += print_warnings(&parser::validate_catalog(&catalog, degree_rules()));

    let plans = if paths.plan.is_dir() {
        parser::load_plan_directory(&paths.plan)?
    } else {
        vec![(paths.plan.clone(), parser::parse_plan(&paths.plan)?)]
    };

    for (path, plan) in &plans {
        println!(
            "Plan: {} ({}, {} records)",
            path.display(),
            plan.profile.student,
            plan.records.len()
        );
        total_warnings += print_warnings(&parser::validate_plan(plan, &catalog));
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warnings(warnings: &[ValidationWarning]) -> usize {
    for w in warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    warnings.len()
}
