//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with the outside world.
//! Driving ports (`LoginService`, `EnrollmentCommand`, `EnrollmentQuery`)
//! are called by inbound adapters; driven ports (`EnrollmentRepository`,
//! `CourseRepository`, `DepartmentRepository`) are implemented by outbound
//! adapters. Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod course_repository;
mod department_repository;
mod enrollment_command;
mod enrollment_query;
mod enrollment_repository;
mod login_service;

#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CourseRepository, CourseRepositoryError, FixtureCourseRepository};
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use department_repository::{
    DepartmentRepository, DepartmentRepositoryError, FixtureDepartmentRepository,
};
pub use enrollment_command::{EnrollmentCommand, FixtureEnrollmentCommand};
pub use enrollment_query::{EnrollmentQuery, FixtureEnrollmentQuery};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{
    EnrollmentRepository, EnrollmentRepositoryError, FixtureEnrollmentRepository,
};
pub use login_service::{FixtureLoginService, LoginService};
