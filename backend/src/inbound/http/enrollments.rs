//! Enrollment API handlers.
//!
//! ```text
//! POST /api/v1/enrollments {"courseId":"..."}
//! DELETE /api/v1/enrollments/{courseId}
//! GET /api/v1/enrollments
//! ```
//!
//! All three endpoints require the student role; the capability check
//! happens here so the domain services stay free of identity concerns.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Enrollment, EnrollmentView, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Request payload for enrolling in a course.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequestBody {
    /// Course to take a seat in.
    #[schema(format = "uuid")]
    pub course_id: String,
}

/// Response payload for a successful enrollment.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentBody {
    /// Enrollment row identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// The enrolled course.
    #[schema(format = "uuid")]
    pub course_id: String,
    /// Lifecycle state, always `enrolled` on creation.
    pub status: String,
    /// When the seat was taken.
    #[schema(format = "date-time")]
    pub enrollment_date: String,
}

impl From<Enrollment> for EnrollmentBody {
    fn from(value: Enrollment) -> Self {
        Self {
            id: value.id.to_string(),
            course_id: value.course_id.to_string(),
            status: value.status.to_string(),
            enrollment_date: value.enrollment_date.to_rfc3339(),
        }
    }
}

/// One row of the student's enrollment listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentViewBody {
    /// Enrollment row identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// The enrolled course.
    #[schema(format = "uuid")]
    pub course_id: String,
    /// Unique course code, e.g. `CS-240`.
    pub course_code: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Optional course description.
    pub description: Option<String>,
    /// When the seat was taken.
    #[schema(format = "date-time")]
    pub enrollment_date: String,
}

impl From<EnrollmentView> for EnrollmentViewBody {
    fn from(value: EnrollmentView) -> Self {
        Self {
            id: value.id.to_string(),
            course_id: value.course_id.to_string(),
            course_code: value.course_code,
            course_name: value.course_name,
            description: value.description,
            enrollment_date: value.enrollment_date.to_rfc3339(),
        }
    }
}

/// Enroll the authenticated student in a course.
///
/// # Errors
///
/// - `400 Bad Request`: malformed course id.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: caller is not a student.
/// - `404 Not Found`: course does not exist.
/// - `409 Conflict`: already enrolled, or the course is full.
/// - `503 Service Unavailable`: enrollment storage failed; nothing was
///   written.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollRequestBody,
    responses(
        (status = 201, description = "Seat taken", body = EnrollmentBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Forbidden", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Course not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Already enrolled or course full", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "enroll",
    security(("SessionCookie" = []))
)]
#[post("/enrollments")]
pub async fn enroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnrollRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    actor.require_role(Role::Student)?;
    let course_id = parse_uuid(&payload.course_id, FieldName::new("courseId"))?;

    let enrollment = state.enrollments.enroll(actor.id(), course_id).await?;

    Ok(HttpResponse::Created().json(EnrollmentBody::from(enrollment)))
}

/// Drop the authenticated student's active enrollment in a course.
#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{courseId}",
    params(
        ("courseId" = String, Path, description = "Course to drop")
    ),
    responses(
        (status = 204, description = "Enrollment dropped"),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Forbidden", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Enrollment not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "unenroll",
    security(("SessionCookie" = []))
)]
#[delete("/enrollments/{courseId}")]
pub async fn unenroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    actor.require_role(Role::Student)?;
    let course_id = parse_uuid(&path.into_inner(), FieldName::new("courseId"))?;

    state.enrollments.unenroll(actor.id(), course_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// List the authenticated student's active enrollments, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    responses(
        (status = 200, description = "Active enrollments", body = [EnrollmentViewBody]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Forbidden", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "listEnrollments",
    security(("SessionCookie" = []))
)]
#[get("/enrollments")]
pub async fn list_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<EnrollmentViewBody>>> {
    let actor = session.require_identity()?;
    actor.require_role(Role::Student)?;

    let views = state.enrollments_query.list_enrollments(actor.id()).await?;

    Ok(web::Json(
        views.into_iter().map(EnrollmentViewBody::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_state, login_and_get_cookie};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture_state()))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(crate::inbound::http::users::login)
                    .service(enroll)
                    .service(unenroll)
                    .service(list_enrollments),
            )
    }

    #[actix_web::test]
    async fn enroll_creates_a_seat_for_students() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;
        let course_id = Uuid::new_v4();

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/enrollments")
            .cookie(cookie)
            .set_json(json!({ "courseId": course_id.to_string() }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("courseId").and_then(Value::as_str),
            Some(course_id.to_string().as_str())
        );
        assert_eq!(body.get("status").and_then(Value::as_str), Some("enrolled"));
    }

    #[actix_web::test]
    async fn enroll_requires_a_session() {
        let app = actix_test::init_service(test_app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/enrollments")
            .set_json(json!({ "courseId": Uuid::new_v4().to_string() }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("instructor")]
    #[case("admin")]
    #[actix_web::test]
    async fn enroll_rejects_non_students(#[case] username: &str) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, username).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/enrollments")
            .cookie(cookie)
            .set_json(json!({ "courseId": Uuid::new_v4().to_string() }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[actix_web::test]
    async fn enroll_rejects_malformed_course_ids(#[case] course_id: &str) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/enrollments")
            .cookie(cookie)
            .set_json(json!({ "courseId": course_id }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("courseId")
        );
    }

    #[actix_web::test]
    async fn unenroll_returns_no_content() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/enrollments/{}", Uuid::new_v4()))
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn unenroll_rejects_malformed_course_ids() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/v1/enrollments/not-a-uuid")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn listing_requires_the_student_role() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "admin").await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/enrollments")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn listing_returns_fixture_rows() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/enrollments")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(0));
    }
}
