//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Academic departments grouping courses.
    departments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique department code (max 8 characters).
        code -> Varchar,
        /// Human-readable department name (max 128 characters).
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue courses carrying the enrollment capacity.
    courses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning department, when assigned.
        department_id -> Nullable<Uuid>,
        /// Unique course code (max 16 characters).
        course_code -> Varchar,
        /// Human-readable course name (max 128 characters).
        course_name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Instructor owning the course; identity lives with the provider.
        instructor_id -> Uuid,
        /// Enrollment capacity; checked to be at least 1.
        max_students -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrollment lifecycle rows; never deleted, only flipped to dropped.
    ///
    /// A partial unique index over `(student_id, course_id)` where
    /// `status = 'enrolled'` backstops the unique-active invariant.
    enrollments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The enrolled student.
        student_id -> Uuid,
        /// The course holding the seat.
        course_id -> Uuid,
        /// Lifecycle state: `enrolled` or `dropped` (checked).
        status -> Varchar,
        /// When the seat was taken.
        enrollment_date -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(courses -> departments (department_id));
diesel::joinable!(enrollments -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(courses, departments, enrollments);
