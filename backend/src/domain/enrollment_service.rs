//! Enrollment domain services.
//!
//! These services implement the enrollment driving ports over the
//! enrollment repository, translating adapter failures into the stable
//! [`EnrollmentError`] taxonomy. The atomicity and per-course serialisation
//! guarantees live behind the repository port; the services stay free of
//! identity and transport concerns.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    EnrollmentCommand, EnrollmentQuery, EnrollmentRepository, EnrollmentRepositoryError,
};
use crate::domain::{Enrollment, EnrollmentError, EnrollmentView, UserId};

fn map_repository_error(error: EnrollmentRepositoryError) -> EnrollmentError {
    match error {
        EnrollmentRepositoryError::AlreadyEnrolled => EnrollmentError::AlreadyEnrolled,
        EnrollmentRepositoryError::CourseFull => EnrollmentError::CourseFull,
        EnrollmentRepositoryError::CourseNotFound => EnrollmentError::CourseNotFound,
        EnrollmentRepositoryError::EnrollmentNotFound => EnrollmentError::EnrollmentNotFound,
        EnrollmentRepositoryError::Connection { message }
        | EnrollmentRepositoryError::Query { message } => {
            EnrollmentError::TransactionFailure { message }
        }
    }
}

/// Enrollment service implementing the command driving port.
#[derive(Clone)]
pub struct EnrollmentCommandService<R> {
    enrollment_repo: Arc<R>,
}

impl<R> EnrollmentCommandService<R> {
    /// Create a new command service with the enrollment repository.
    pub fn new(enrollment_repo: Arc<R>) -> Self {
        Self { enrollment_repo }
    }
}

#[async_trait]
impl<R> EnrollmentCommand for EnrollmentCommandService<R>
where
    R: EnrollmentRepository,
{
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentError> {
        self.enrollment_repo
            .enroll(student_id, course_id)
            .await
            .map_err(map_repository_error)
    }

    async fn unenroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<(), EnrollmentError> {
        self.enrollment_repo
            .mark_dropped(student_id, course_id)
            .await
            .map_err(map_repository_error)
    }
}

/// Enrollment service implementing the query driving port.
#[derive(Clone)]
pub struct EnrollmentQueryService<R> {
    enrollment_repo: Arc<R>,
}

impl<R> EnrollmentQueryService<R> {
    /// Create a new query service with the enrollment repository.
    pub fn new(enrollment_repo: Arc<R>) -> Self {
        Self { enrollment_repo }
    }
}

#[async_trait]
impl<R> EnrollmentQuery for EnrollmentQueryService<R>
where
    R: EnrollmentRepository,
{
    async fn list_enrollments(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentError> {
        self.enrollment_repo
            .list_active_for_student(student_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
