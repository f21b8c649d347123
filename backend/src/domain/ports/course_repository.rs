//! Driven port for course catalogue persistence.
//!
//! Read handlers use this port directly; there is no business logic between
//! the catalogue endpoints and storage beyond validation and error mapping.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Course, CourseSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Another course already uses this code.
        DuplicateCode { code: String } => "course code {code} already exists",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course repository query failed: {message}",
    }
}

/// Port for writing and reading catalogue courses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course.
    async fn create(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Find a course by id.
    async fn find_by_id(&self, course_id: Uuid)
    -> Result<Option<Course>, CourseRepositoryError>;

    /// List all courses with their live active-enrollment counts, read in a
    /// single consistent snapshot.
    async fn list_with_enrollment_counts(
        &self,
    ) -> Result<Vec<CourseSummary>, CourseRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCourseRepository;

#[async_trait]
impl CourseRepository for FixtureCourseRepository {
    async fn create(&self, _course: &Course) -> Result<(), CourseRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _course_id: Uuid,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        Ok(None)
    }

    async fn list_with_enrollment_counts(
        &self,
    ) -> Result<Vec<CourseSummary>, CourseRepositoryError> {
        Ok(Vec::new())
    }
}
