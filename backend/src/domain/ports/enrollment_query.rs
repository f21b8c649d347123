//! Driving port for enrollment reads.

use async_trait::async_trait;

use crate::domain::{EnrollmentError, EnrollmentView, UserId};

/// Domain use-case port for reading a student's active enrollments.
#[async_trait]
pub trait EnrollmentQuery: Send + Sync {
    /// List the student's active enrollments, most recent first.
    async fn list_enrollments(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentError>;
}

/// Fixture implementation for handler tests without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentQuery;

#[async_trait]
impl EnrollmentQuery for FixtureEnrollmentQuery {
    async fn list_enrollments(
        &self,
        _student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentError> {
        Ok(Vec::new())
    }
}
