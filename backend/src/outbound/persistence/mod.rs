//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. The one piece of logic living here is
//!   the transactional enroll unit of work, because its isolation guarantee
//!   is a storage concern.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to domain
//!   port error types.

mod diesel_course_repository;
mod diesel_department_repository;
mod diesel_enrollment_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
