//! Driven port for department persistence.

use async_trait::async_trait;

use crate::domain::Department;

use super::define_port_error;

define_port_error! {
    /// Errors raised by department repository adapters.
    pub enum DepartmentRepositoryError {
        /// Another department already uses this code.
        DuplicateCode { code: String } => "department code {code} already exists",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "department repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "department repository query failed: {message}",
    }
}

/// Port for writing and reading departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Persist a new department.
    async fn create(&self, department: &Department) -> Result<(), DepartmentRepositoryError>;

    /// List all departments ordered by code.
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDepartmentRepository;

#[async_trait]
impl DepartmentRepository for FixtureDepartmentRepository {
    async fn create(&self, _department: &Department) -> Result<(), DepartmentRepositoryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        Ok(Vec::new())
    }
}
