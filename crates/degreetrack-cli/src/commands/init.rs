//! The `degreetrack init` command.

use std::path::Path;

use anyhow::Result;

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

pub fn execute() -> Result<()> {
    write_if_missing("degreetrack.toml", SAMPLE_CONFIG)?;
    write_if_missing("catalog.toml", SAMPLE_CATALOG)?;
    write_if_missing("plan.toml", SAMPLE_PLAN)?;

    println!("\nNext steps:");
    println!("  1. Edit plan.toml with your student id and courses");
    println!("  2. Run: degreetrack validate");
    println!("  3. Run: degreetrack evaluate --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# degreetrack configuration

catalog = "catalog.toml"
plan = "plan.toml"
output_dir = "./degreetrack-reports"
semester_count = 8
parallelism = 4
"#;

const SAMPLE_CATALOG: &str = r#"# Course catalog. `group` is the requirement id a course counts toward,
# `sub_group` the sub-requirement within it.

[[courses]]
id = "formal-methods"
code = "SSS-101"
title = "Formal Methods"
credits = 6
group = "A1"
sub_group = "S1"
frequency = "WS"
language = "en"
exam_type = "written"

[[courses]]
id = "distributed-systems"
code = "SSS-201"
title = "Distributed Systems"
credits = 6
group = "A1"
sub_group = "S2"
frequency = "SS"
language = "en"
exam_type = "written"

[[courses]]
id = "software-architecture"
code = "SSS-301"
title = "Software Architecture"
credits = 6
group = "A1"
sub_group = "S3"
frequency = "WS"
language = "en"
exam_type = "project"

[[courses]]
id = "bioinformatics"
code = "DOM-110"
title = "Bioinformatics"
credits = 6
group = "A2"
frequency = "SS"
language = "en"

[[courses]]
id = "masters-seminar"
code = "SEM-900"
title = "Master's Seminar"
credits = 3
group = "A3"
frequency = "every semester"
language = "en"

[[courses]]
id = "masters-project"
code = "PRJ-900"
title = "Master's Project"
credits = 6
group = "A3"
variable_credits = true
max_credits = 9
frequency = "every semester"
language = "en"

[[courses]]
id = "masters-thesis"
code = "THE-999"
title = "Master's Thesis"
credits = 30
group = "A4"
frequency = "every semester"
language = "en"

[[courses]]
id = "semester-abroad"
code = "INT-100"
title = "Semester Abroad"
credits = 12
group = "A5"
variable_credits = true
max_credits = 27
frequency = "every semester"
language = "en"
"#;

const SAMPLE_PLAN: &str = r#"[profile]
student = "student"
start_term = "WS"
start_year = 2025

[[records]]
id = "r1"
course = "formal-methods"
status = "passed"
term = "WS"
year = 2025

[[records]]
id = "r2"
course = "distributed-systems"
status = "in_progress"
term = "SS"
year = 2026

[[records]]
id = "r3"
course = "masters-seminar"
status = "planned"
term = "WS"
year = 2026
"#;
