//! Plan editing commands: `add`, `status`, `move`, `remove`, `credits`.
//!
//! Every change goes through the file store and is written back to the plan
//! file immediately.

use anyhow::Result;

use degreetrack_core::model::{CourseRecord, RecordStatus};
use degreetrack_core::semester::{Term, TermPlacement};
use degreetrack_core::traits::RecordStore;

use super::DataArgs;

fn print_record(action: &str, record: &CourseRecord) {
    let credits = record
        .credit_override
        .map(|c| format!(", {c} credits (override)"))
        .unwrap_or_default();
    println!(
        "{action} record {}: {} [{}] in {}{}",
        record.id,
        record.course_id,
        record.status,
        record.placement.label(),
        credits
    );
}

pub async fn add(
    data: DataArgs,
    course: String,
    term: Option<Term>,
    year: Option<i32>,
) -> Result<()> {
    let (store, student) = data.open_store().await?;
    let start = store.profile(&student).await?.start;
    let placement = TermPlacement::new(term.unwrap_or(start.term), year.unwrap_or(start.year));

    let record = store.add_record(&student, &course, placement).await?;
    print_record("Added", &record);
    Ok(())
}

pub async fn set_status(data: DataArgs, record_id: String, status: RecordStatus) -> Result<()> {
    let (store, student) = data.open_store().await?;
    let record = store.update_status(&student, &record_id, status).await?;
    print_record("Updated", &record);
    Ok(())
}

pub async fn move_record(data: DataArgs, record_id: String, term: Term, year: i32) -> Result<()> {
    let (store, student) = data.open_store().await?;
    let record = store
        .update_placement(&student, &record_id, TermPlacement::new(term, year))
        .await?;
    print_record("Moved", &record);
    Ok(())
}

pub async fn remove(data: DataArgs, record_id: String) -> Result<()> {
    let (store, student) = data.open_store().await?;
    store.remove_record(&student, &record_id).await?;
    println!("Removed record {record_id}");
    Ok(())
}

pub async fn set_credits(data: DataArgs, record_id: String, value: Option<u32>) -> Result<()> {
    let (store, student) = data.open_store().await?;

    if let Some(credits) = value {
        warn_on_unusual_override(&store, &student, &record_id, credits).await?;
    }

    let record = store
        .set_credit_override(&student, &record_id, value)
        .await?;
    print_record("Updated", &record);
    Ok(())
}

/// Overrides are stored as given; flag the ones a catalog would not allow.
async fn warn_on_unusual_override(
    store: &dyn RecordStore,
    student: &str,
    record_id: &str,
    credits: u32,
) -> Result<()> {
    let records = store.records(student).await?;
    let Some(record) = records.iter().find(|r| r.id == record_id) else {
        return Ok(());
    };
    let catalog = store.catalog().await?;
    if let Some(course) = catalog.find(&record.course_id) {
        if !course.variable_credits {
            tracing::warn!("{} has fixed credits, overriding anyway", course.code);
        }
        if course.max_credits.is_some_and(|max| credits > max) {
            tracing::warn!("{credits} credits exceeds the maximum for {}", course.code);
        }
    }
    Ok(())
}
