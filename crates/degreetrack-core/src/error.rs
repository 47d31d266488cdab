//! Record store error types.
//!
//! The evaluation engine itself never fails; these errors come from the
//! stores that supply it with catalog, profile, and record data.

use thiserror::Error;

/// Errors that can occur when reading from or writing to a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id exists in the student's plan.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// The catalog has no course with this id.
    #[error("course not found: {0}")]
    CourseNotFound(String),

    /// The student's plan already has a record for this course.
    #[error("course already in plan: {0}")]
    AlreadyPlanned(String),

    /// The store holds no data for this student.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing data could not be parsed or serialized.
    #[error("invalid store data: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Returns `true` if the error means a looked-up entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::RecordNotFound(_)
                | StoreError::CourseNotFound(_)
                | StoreError::StudentNotFound(_)
        )
    }
}
