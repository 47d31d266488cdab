//! Record store trait.
//!
//! The engine only reads snapshots; stores own persistence and mutation.
//! Implemented by [`crate::store::InMemoryStore`] and
//! [`crate::store::FileStore`].

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Catalog, CourseRecord, Profile, RecordStatus};
use crate::semester::TermPlacement;

/// CRUD access to the catalog, student profiles, and course records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The full course catalog.
    async fn catalog(&self) -> Result<Catalog, StoreError>;

    /// Identifiers of every student the store holds.
    async fn students(&self) -> Result<Vec<String>, StoreError>;

    async fn profile(&self, student: &str) -> Result<Profile, StoreError>;

    async fn update_profile(&self, profile: Profile) -> Result<Profile, StoreError>;

    /// Every course record of a student's plan.
    async fn records(&self, student: &str) -> Result<Vec<CourseRecord>, StoreError>;

    /// Add a course to a student's plan. The new record starts as planned.
    async fn add_record(
        &self,
        student: &str,
        course_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError>;

    async fn update_status(
        &self,
        student: &str,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<CourseRecord, StoreError>;

    async fn update_placement(
        &self,
        student: &str,
        record_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError>;

    /// Set (or clear, with `None`) the credit override of a record.
    async fn set_credit_override(
        &self,
        student: &str,
        record_id: &str,
        credits: Option<u32>,
    ) -> Result<CourseRecord, StoreError>;

    async fn remove_record(&self, student: &str, record_id: &str) -> Result<(), StoreError>;
}
