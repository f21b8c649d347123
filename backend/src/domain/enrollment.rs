//! Enrollment lifecycle entities and the enrollment error taxonomy.
//!
//! An enrollment is the join entity between a student and a course. It is
//! created `enrolled` and only ever flips to `dropped`; rows are never
//! physically deleted so history is retained.
//!
//! ## Invariants
//! - **Unique-active**: at most one `enrolled` row exists per
//!   `(student_id, course_id)` pair at any time.
//! - **Capacity**: the number of `enrolled` rows for a course never exceeds
//!   the course's `max_students` in any committed state.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::{Error, UserId};

/// Lifecycle state of an enrollment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentStatus {
    /// The student currently holds a seat in the course.
    Enrolled,
    /// The student gave the seat up; the row remains as history.
    Dropped,
}

/// Error returned when a stored status string names no known state.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown enrollment status: {value}")]
pub struct ParseEnrollmentStatusError {
    /// The rejected input.
    pub value: String,
}

impl EnrollmentStatus {
    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = ParseEnrollmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(Self::Enrolled),
            "dropped" => Ok(Self::Dropped),
            other => Err(ParseEnrollmentStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A persisted enrollment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// Row identifier.
    pub id: Uuid,
    /// The enrolled student.
    pub student_id: UserId,
    /// The course holding the seat.
    pub course_id: Uuid,
    /// Lifecycle state.
    pub status: EnrollmentStatus,
    /// When the seat was taken.
    pub enrollment_date: DateTime<Utc>,
}

/// An active enrollment joined with course metadata for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentView {
    /// Enrollment row identifier.
    pub id: Uuid,
    /// The enrolled course.
    pub course_id: Uuid,
    /// Unique course code, e.g. `CS-240`.
    pub course_code: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Optional course description.
    pub description: Option<String>,
    /// When the seat was taken.
    pub enrollment_date: DateTime<Utc>,
}

/// Failure taxonomy for enrollment operations.
///
/// Every variant carries a distinct, stable message the caller can relay.
/// Storage-layer failures surface as [`EnrollmentError::TransactionFailure`]
/// and are never silently retried here; retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum EnrollmentError {
    /// An active enrollment already exists for this student and course.
    #[error("Already enrolled in this course")]
    AlreadyEnrolled,
    /// The course has no remaining capacity.
    #[error("Course is full")]
    CourseFull,
    /// The course does not exist.
    #[error("Course not found")]
    CourseNotFound,
    /// No active enrollment matches the student and course.
    #[error("Enrollment not found")]
    EnrollmentNotFound,
    /// The storage layer failed; the transaction rolled back completely.
    #[error("enrollment transaction failed: {message}")]
    TransactionFailure {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl From<EnrollmentError> for Error {
    fn from(value: EnrollmentError) -> Self {
        match value {
            EnrollmentError::AlreadyEnrolled | EnrollmentError::CourseFull => {
                Error::conflict(value.to_string())
            }
            EnrollmentError::CourseNotFound | EnrollmentError::EnrollmentNotFound => {
                Error::not_found(value.to_string())
            }
            EnrollmentError::TransactionFailure { message } => {
                tracing::error!(error = %message, "enrollment transaction failed");
                Error::service_unavailable("Enrollment storage is unavailable")
            }
        }
    }
}
