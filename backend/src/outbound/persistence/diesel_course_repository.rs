//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.
//!
//! Catalogue reads load the course rows and the active-enrollment counts in
//! a single transaction so both SELECTs observe one snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{Course, CourseDraft, CourseSummary, EnrollmentStatus, UserId};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel-backed implementation of the course repository port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, |message| CourseRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain course.
fn row_to_course(row: CourseRow) -> Result<Course, CourseRepositoryError> {
    let CourseRow {
        id,
        department_id,
        course_code,
        course_name,
        description,
        instructor_id,
        max_students,
    } = row;

    Course::new(CourseDraft {
        id,
        department_id,
        course_code,
        course_name,
        description,
        instructor_id: UserId::from_uuid(instructor_id),
        max_students,
    })
    .map_err(|err| CourseRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn create(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCourseRow {
            id: course.id(),
            department_id: course.department_id(),
            course_code: course.course_code(),
            course_name: course.course_name(),
            description: course.description(),
            instructor_id: *course.instructor_id().as_uuid(),
            max_students: course.max_students(),
        };

        diesel::insert_into(courses::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CourseRepositoryError::duplicate_code(course.course_code())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        course_id: Uuid,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = courses::table
            .find(course_id)
            .select(CourseRow::as_select())
            .first::<CourseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_course).transpose()
    }

    async fn list_with_enrollment_counts(
        &self,
    ) -> Result<Vec<CourseSummary>, CourseRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Read both tables in a single transaction so the counts match the
        // course rows.
        let (rows, counts) = conn
            .transaction::<(Vec<CourseRow>, Vec<(Uuid, i64)>), diesel::result::Error, _>(
                |conn| {
                    async move {
                        let rows: Vec<CourseRow> = courses::table
                            .order(courses::course_code.asc())
                            .select(CourseRow::as_select())
                            .load(conn)
                            .await?;

                        let counts: Vec<(Uuid, i64)> = enrollments::table
                            .filter(
                                enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()),
                            )
                            .group_by(enrollments::course_id)
                            .select((enrollments::course_id, diesel::dsl::count_star()))
                            .load(conn)
                            .await?;

                        Ok((rows, counts))
                    }
                    .scope_boxed()
                },
            )
            .await
            .map_err(map_diesel_error)?;

        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();
        rows.into_iter()
            .map(|row| {
                let enrolled_count = counts.get(&row.id).copied().unwrap_or(0);
                Ok(CourseSummary {
                    course: row_to_course(row)?,
                    enrolled_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use diesel::result::DatabaseErrorKind;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> CourseRow {
        CourseRow {
            id: Uuid::new_v4(),
            department_id: None,
            course_code: "CS-240".to_owned(),
            course_name: "Programming in Rust".to_owned(),
            description: None,
            instructor_id: Uuid::new_v4(),
            max_students: 30,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(
            repo_err,
            CourseRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn row_conversion_round_trips(valid_row: CourseRow) {
        let course = row_to_course(valid_row).expect("valid row converts");
        assert_eq!(course.course_code(), "CS-240");
    }

    #[rstest]
    fn row_conversion_rejects_invalid_capacity(mut valid_row: CourseRow) {
        valid_row.max_students = 0;

        let error = row_to_course(valid_row).expect_err("invalid capacity should fail");
        assert!(matches!(error, CourseRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unique_violations_surface_the_course_code() {
        let violation = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        let mapped = if is_unique_violation(&violation) {
            CourseRepositoryError::duplicate_code("CS-240")
        } else {
            map_diesel_error(violation)
        };
        assert_eq!(
            mapped,
            CourseRepositoryError::DuplicateCode {
                code: "CS-240".to_owned()
            }
        );
    }
}
