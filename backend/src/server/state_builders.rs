//! Builders wiring repository-backed ports into HTTP handler state.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    FixtureCourseRepository, FixtureDepartmentRepository, FixtureEnrollmentCommand,
    FixtureEnrollmentQuery, FixtureLoginService,
};
use backend::domain::{EnrollmentCommandService, EnrollmentQueryService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{
    DieselCourseRepository, DieselDepartmentRepository, DieselEnrollmentRepository,
};

use super::ServerConfig;

/// Build HTTP handler state from the server configuration.
///
/// With a database pool the enrollment services run over the Diesel
/// repository and the catalogue/department ports hit PostgreSQL directly;
/// without one everything is backed by fixtures. Login stays on the fixture
/// identity provider either way until a real provider is wired.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            let enrollment_repo = Arc::new(DieselEnrollmentRepository::new(pool.clone()));
            HttpStatePorts {
                login: Arc::new(FixtureLoginService),
                enrollments: Arc::new(EnrollmentCommandService::new(Arc::clone(
                    &enrollment_repo,
                ))),
                enrollments_query: Arc::new(EnrollmentQueryService::new(enrollment_repo)),
                courses: Arc::new(DieselCourseRepository::new(pool.clone())),
                departments: Arc::new(DieselDepartmentRepository::new(pool.clone())),
            }
        }
        None => HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            enrollments: Arc::new(FixtureEnrollmentCommand),
            enrollments_query: Arc::new(FixtureEnrollmentQuery),
            courses: Arc::new(FixtureCourseRepository),
            departments: Arc::new(FixtureDepartmentRepository),
        },
    };

    web::Data::new(HttpState::new(ports))
}
