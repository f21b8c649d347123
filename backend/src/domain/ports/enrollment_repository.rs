//! Driven port for enrollment persistence.
//!
//! The adapter behind this port owns the atomic enroll unit of work: the
//! duplicate check, the capacity check against a live count, and the insert
//! must execute inside one transaction, serialised per course, so that no
//! partial write is ever observable and a course can never be overbooked.
//! Business outcomes (`AlreadyEnrolled`, `CourseFull`, ...) are reported as
//! typed variants rather than adapter-specific failures.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Enrollment, EnrollmentStatus, EnrollmentView, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment repository adapters.
    pub enum EnrollmentRepositoryError {
        /// An active enrollment already exists for this student and course.
        AlreadyEnrolled =>
            "an active enrollment already exists for this student and course",
        /// The course has no remaining capacity.
        CourseFull => "course has no remaining capacity",
        /// The course does not exist.
        CourseNotFound => "course does not exist",
        /// No active enrollment matches the student and course.
        EnrollmentNotFound => "no active enrollment matches",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "enrollment repository query failed: {message}",
    }
}

/// Port for the transactional enrollment unit of work and its reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Atomically enroll a student: check for an active duplicate, check
    /// capacity against a live count, and insert, all in one per-course
    /// serialised transaction.
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentRepositoryError>;

    /// Flip the matching active enrollment to `dropped`.
    async fn mark_dropped(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<(), EnrollmentRepositoryError>;

    /// Read the student's active enrollments joined with course metadata,
    /// most recent first.
    async fn list_active_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentRepository;

#[async_trait]
impl EnrollmentRepository for FixtureEnrollmentRepository {
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentRepositoryError> {
        Ok(Enrollment {
            id: Uuid::new_v4(),
            student_id: *student_id,
            course_id,
            status: EnrollmentStatus::Enrolled,
            enrollment_date: Utc::now(),
        })
    }

    async fn mark_dropped(
        &self,
        _student_id: &UserId,
        _course_id: Uuid,
    ) -> Result<(), EnrollmentRepositoryError> {
        Ok(())
    }

    async fn list_active_for_student(
        &self,
        _student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentRepositoryError> {
        Ok(Vec::new())
    }
}
