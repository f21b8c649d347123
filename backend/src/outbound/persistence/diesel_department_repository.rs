//! PostgreSQL-backed `DepartmentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};
use crate::domain::{Department, DepartmentDraft};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{DepartmentRow, NewDepartmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::departments;

/// Diesel-backed implementation of the department repository port.
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DepartmentRepositoryError {
    map_basic_pool_error(error, |message| {
        DepartmentRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> DepartmentRepositoryError {
    map_basic_diesel_error(
        error,
        DepartmentRepositoryError::query,
        DepartmentRepositoryError::connection,
    )
}

fn row_to_department(row: DepartmentRow) -> Result<Department, DepartmentRepositoryError> {
    let DepartmentRow { id, code, name } = row;
    Department::new(DepartmentDraft { id, code, name })
        .map_err(|err| DepartmentRepositoryError::query(err.to_string()))
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn create(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewDepartmentRow {
            id: department.id(),
            code: department.code(),
            name: department.name(),
        };

        diesel::insert_into(departments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    DepartmentRepositoryError::duplicate_code(department.code())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DepartmentRow> = departments::table
            .order(departments::code.asc())
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_department).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn row_conversion_round_trips() {
        let department = row_to_department(DepartmentRow {
            id: Uuid::new_v4(),
            code: "CS".to_owned(),
            name: "Computer Science".to_owned(),
        })
        .expect("valid row converts");
        assert_eq!(department.code(), "CS");
    }

    #[rstest]
    fn row_conversion_rejects_invalid_code() {
        let error = row_to_department(DepartmentRow {
            id: Uuid::new_v4(),
            code: "cs".to_owned(),
            name: "Computer Science".to_owned(),
        })
        .expect_err("lowercase code should fail");
        assert!(matches!(error, DepartmentRepositoryError::Query { .. }));
    }
}
