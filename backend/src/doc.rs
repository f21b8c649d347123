//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: all HTTP endpoints from the inbound layer.
//! - **Schemas**: request/response bodies plus the domain error wrappers
//!   from [`crate::inbound::http::schemas`].
//! - **Security**: the session cookie authentication scheme.
//!
//! The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::courses::{CourseBody, CourseSummaryBody, CreateCourseRequestBody};
use crate::inbound::http::departments::{CreateDepartmentRequestBody, DepartmentBody};
use crate::inbound::http::enrollments::{
    EnrollRequestBody, EnrollmentBody, EnrollmentViewBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{IdentityBody, LoginRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
///
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Course portal backend API",
        description = "HTTP interface for course enrollment, catalogue, and department management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_identity,
        crate::inbound::http::enrollments::enroll,
        crate::inbound::http::enrollments::unenroll,
        crate::inbound::http::enrollments::list_enrollments,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::departments::list_departments,
        crate::inbound::http::departments::create_department,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        IdentityBody,
        EnrollRequestBody,
        EnrollmentBody,
        EnrollmentViewBody,
        CreateCourseRequestBody,
        CourseBody,
        CourseSummaryBody,
        CreateDepartmentRequestBody,
        DepartmentBody,
    ))
)]
pub struct ApiDoc;
