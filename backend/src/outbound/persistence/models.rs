//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations. Audit columns are omitted
//! from read rows the adapters do not consume.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{courses, departments, enrollments};

/// Row struct for reading from the departments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// Insertable struct for creating new department records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub name: &'a str,
}

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub instructor_id: Uuid,
    pub max_students: i32,
}

/// Insertable struct for creating new course records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub description: Option<&'a str>,
    pub instructor_id: Uuid,
    pub max_students: i32,
}

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub enrollment_date: DateTime<Utc>,
}

/// Insertable struct for creating new enrollment records.
///
/// `enrollment_date` and the audit columns are filled by column defaults so
/// the commit timestamp comes from the database clock.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: &'a str,
}
