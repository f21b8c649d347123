//! Driving port for enrollment mutations.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Enrollment, EnrollmentError, EnrollmentStatus, UserId};

/// Domain use-case port for taking and releasing course seats.
///
/// Callers must have already established that the actor holds the student
/// role; this port receives plain identifiers and performs no identity
/// checks.
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enroll the student in the course, atomically enforcing the
    /// unique-active and capacity invariants.
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentError>;

    /// Drop the student's active enrollment in the course.
    async fn unenroll(&self, student_id: &UserId, course_id: Uuid)
    -> Result<(), EnrollmentError>;
}

/// Fixture implementation for handler tests without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentCommand;

#[async_trait]
impl EnrollmentCommand for FixtureEnrollmentCommand {
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentError> {
        Ok(Enrollment {
            id: Uuid::new_v4(),
            student_id: *student_id,
            course_id,
            status: EnrollmentStatus::Enrolled,
            enrollment_date: Utc::now(),
        })
    }

    async fn unenroll(
        &self,
        _student_id: &UserId,
        _course_id: Uuid,
    ) -> Result<(), EnrollmentError> {
        Ok(())
    }
}
