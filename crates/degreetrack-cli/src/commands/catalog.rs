//! The `degreetrack catalog` command.

use std::collections::HashMap;

use anyhow::Result;
use comfy_table::{Cell, Table};

use degreetrack_core::model::{Course, RecordStatus};
use degreetrack_core::parser;

use super::DataArgs;

pub fn execute(data: DataArgs, search: Option<String>, group: Option<String>) -> Result<()> {
    let paths = data.resolve()?;
    let catalog = parser::parse_catalog(&paths.catalog)?;

    // Without a plan file the catalog is still listable.
    let planned: HashMap<String, RecordStatus> = if paths.plan.is_file() {
        parser::parse_plan(&paths.plan)?
            .records
            .into_iter()
            .map(|r| (r.course_id, r.status))
            .collect()
    } else {
        HashMap::new()
    };

    let courses: Vec<&Course> = if search.is_some() || group.is_some() {
        catalog.search(search.as_deref().unwrap_or(""), group.as_deref())
    } else {
        catalog.sorted()
    };

    if courses.is_empty() {
        println!("No matching courses.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Code", "Title", "Credits", "Group", "Area", "Offered", "Language", "Plan",
    ]);
    for course in &courses {
        let credits = match (course.variable_credits, course.max_credits) {
            (true, Some(max)) => format!("{} (≤{max})", course.credits),
            (true, None) => format!("{} (var)", course.credits),
            _ => course.credits.to_string(),
        };
        table.add_row(vec![
            Cell::new(&course.id),
            Cell::new(&course.code),
            Cell::new(&course.title),
            Cell::new(credits),
            Cell::new(&course.group),
            Cell::new(course.sub_group.as_deref().unwrap_or("-")),
            Cell::new(&course.frequency),
            Cell::new(&course.language),
            Cell::new(
                planned
                    .get(&course.id)
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }

    println!("{table}");
    println!("{} course(s)", courses.len());
    Ok(())
}
