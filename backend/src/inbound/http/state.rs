//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CourseRepository, DepartmentRepository, EnrollmentCommand, EnrollmentQuery, LoginService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub enrollments_query: Arc<dyn EnrollmentQuery>,
    pub courses: Arc<dyn CourseRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub enrollments_query: Arc<dyn EnrollmentQuery>,
    pub courses: Arc<dyn CourseRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureCourseRepository, FixtureDepartmentRepository, FixtureEnrollmentCommand,
    ///     FixtureEnrollmentQuery, FixtureLoginService,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     enrollments: Arc::new(FixtureEnrollmentCommand),
    ///     enrollments_query: Arc::new(FixtureEnrollmentQuery),
    ///     courses: Arc::new(FixtureCourseRepository),
    ///     departments: Arc::new(FixtureDepartmentRepository),
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            enrollments,
            enrollments_query,
            courses,
            departments,
        } = ports;
        Self {
            login,
            enrollments,
            enrollments_query,
            courses,
            departments,
        }
    }
}
