//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel ORM.
//!
//! This adapter owns the atomic enroll unit of work. The transaction locks
//! the course row up front (`SELECT ... FOR UPDATE`) so the duplicate check,
//! the capacity count, and the insert serialise per course: two concurrent
//! enrolls for the same course cannot both observe a free seat, while
//! enrolls for different courses proceed in parallel. Every failure rolls
//! the whole transaction back, so no partial write is ever observable.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{Enrollment, EnrollmentStatus, EnrollmentView, UserId};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{CourseRow, EnrollmentRow, NewEnrollmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel-backed implementation of the enrollment repository port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> EnrollmentRepositoryError {
    map_basic_pool_error(error, |message| {
        EnrollmentRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> EnrollmentRepositoryError {
    map_basic_diesel_error(
        error,
        EnrollmentRepositoryError::query,
        EnrollmentRepositoryError::connection,
    )
}

/// Outcome of the enroll transaction before mapping to the port error.
enum EnrollTxError {
    AlreadyEnrolled,
    CourseFull,
    CourseNotFound,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for EnrollTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_enroll_tx_error(error: EnrollTxError) -> EnrollmentRepositoryError {
    match error {
        EnrollTxError::AlreadyEnrolled => EnrollmentRepositoryError::already_enrolled(),
        EnrollTxError::CourseFull => EnrollmentRepositoryError::course_full(),
        EnrollTxError::CourseNotFound => EnrollmentRepositoryError::course_not_found(),
        // The partial unique index backstops the duplicate check; a unique
        // violation can only mean a concurrent active enrollment won.
        EnrollTxError::Diesel(error) if is_unique_violation(&error) => {
            EnrollmentRepositoryError::already_enrolled()
        }
        EnrollTxError::Diesel(error) => map_diesel_error(error),
    }
}

/// Convert a database row into a validated domain enrollment.
fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment, EnrollmentRepositoryError> {
    let EnrollmentRow {
        id,
        student_id,
        course_id,
        status,
        enrollment_date,
    } = row;

    let status: EnrollmentStatus = status
        .parse()
        .map_err(|err: crate::domain::ParseEnrollmentStatusError| {
            EnrollmentRepositoryError::query(err.to_string())
        })?;

    Ok(Enrollment {
        id,
        student_id: UserId::from_uuid(student_id),
        course_id,
        status,
        enrollment_date,
    })
}

fn rows_to_view(
    (enrollment, course): (EnrollmentRow, CourseRow),
) -> Result<EnrollmentView, EnrollmentRepositoryError> {
    let enrollment = row_to_enrollment(enrollment)?;
    Ok(EnrollmentView {
        id: enrollment.id,
        course_id: course.id,
        course_code: course.course_code,
        course_name: course.course_name,
        description: course.description,
        enrollment_date: enrollment.enrollment_date,
    })
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let student = *student_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction::<EnrollmentRow, EnrollTxError, _>(|conn| {
                async move {
                    // Lock the course row first so every later read in this
                    // transaction is serialised against concurrent enrolls
                    // for the same course.
                    let capacity: Option<i32> = courses::table
                        .find(course_id)
                        .select(courses::max_students)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(max_students) = capacity else {
                        return Err(EnrollTxError::CourseNotFound);
                    };

                    // Duplicate check precedes the capacity check so a
                    // student re-submitting on a full course still sees
                    // "already enrolled".
                    let already_active: bool = diesel::select(diesel::dsl::exists(
                        enrollments::table
                            .filter(enrollments::student_id.eq(student))
                            .filter(enrollments::course_id.eq(course_id))
                            .filter(
                                enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()),
                            ),
                    ))
                    .get_result(conn)
                    .await?;
                    if already_active {
                        return Err(EnrollTxError::AlreadyEnrolled);
                    }

                    let active: i64 = enrollments::table
                        .filter(enrollments::course_id.eq(course_id))
                        .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    if active >= i64::from(max_students) {
                        return Err(EnrollTxError::CourseFull);
                    }

                    let new_row = NewEnrollmentRow {
                        id: Uuid::new_v4(),
                        student_id: student,
                        course_id,
                        status: EnrollmentStatus::Enrolled.as_str(),
                    };
                    let row = diesel::insert_into(enrollments::table)
                        .values(&new_row)
                        .returning(EnrollmentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_enroll_tx_error)?;

        row_to_enrollment(row)
    }

    async fn mark_dropped(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A single conditional UPDATE is atomic: either the active row flips
        // to dropped or nothing changes.
        let updated = diesel::update(
            enrollments::table
                .filter(enrollments::student_id.eq(student_id.as_uuid()))
                .filter(enrollments::course_id.eq(course_id))
                .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str())),
        )
        .set(enrollments::status.eq(EnrollmentStatus::Dropped.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(EnrollmentRepositoryError::enrollment_not_found());
        }
        Ok(())
    }

    async fn list_active_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(EnrollmentRow, CourseRow)> = enrollments::table
            .inner_join(courses::table)
            .filter(enrollments::student_id.eq(student_id.as_uuid()))
            .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()))
            .order((
                enrollments::enrollment_date.desc(),
                enrollments::id.desc(),
            ))
            .select((EnrollmentRow::as_select(), CourseRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(rows_to_view).collect()
    }
}
