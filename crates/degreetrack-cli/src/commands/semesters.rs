//! The `degreetrack semesters` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use degreetrack_core::parser;
use degreetrack_core::semester::{group_by_semester, semester_sequence};

use super::DataArgs;

pub fn execute(data: DataArgs, count: Option<usize>) -> Result<()> {
    let paths = data.resolve()?;
    let count = count.unwrap_or(paths.config.semester_count);
    anyhow::ensure!(count >= 1, "semester count must be at least 1");

    let catalog = parser::parse_catalog(&paths.catalog)?;
    let plan = parser::parse_plan(&paths.plan)?;
    let resolved = catalog.resolve(&plan.records);

    let semesters = semester_sequence(plan.profile.start, count);
    let buckets = group_by_semester(&resolved, &semesters);

    println!("Semester plan: {}", plan.profile.student);

    for (index, bucket) in buckets.iter().enumerate() {
        let heading = if index < semesters.len() {
            format!("{}. {}", index + 1, bucket.placement.label())
        } else {
            format!("{} (outside plan window)", bucket.placement.label())
        };
        println!("\n{heading}: {} credits", bucket.credits());
        if bucket.is_overloaded() {
            println!("  ⚠ High workload ({} credits)", bucket.credits());
        }

        if bucket.records.is_empty() {
            println!("  (no courses)");
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Record", "Code", "Title", "Credits", "Group", "Status"]);
        for record in &bucket.records {
            table.add_row(vec![
                Cell::new(&record.record.id),
                Cell::new(&record.course.code),
                Cell::new(&record.course.title),
                Cell::new(record.effective_credits()),
                Cell::new(&record.course.group),
                Cell::new(record.status()),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
