//! Course catalogue API handlers.
//!
//! ```text
//! GET /api/v1/courses
//! POST /api/v1/courses
//! GET /api/v1/courses/{courseId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CourseRepositoryError;
use crate::domain::{
    Course, CourseDraft, CourseSummary, CourseValidationError, Error, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Request payload for creating a course.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequestBody {
    /// Unique course code, e.g. `CS-240`.
    pub course_code: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning department, when assigned.
    #[serde(default)]
    #[schema(format = "uuid")]
    pub department_id: Option<String>,
    /// Enrollment capacity; must admit at least one student.
    pub max_students: i32,
}

/// A catalogue course as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseBody {
    /// Course identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Owning department, when assigned.
    #[schema(format = "uuid")]
    pub department_id: Option<String>,
    /// Unique course code.
    pub course_code: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Instructor owning the course.
    #[schema(format = "uuid")]
    pub instructor_id: String,
    /// Enrollment capacity.
    pub max_students: i32,
}

impl From<Course> for CourseBody {
    fn from(course: Course) -> Self {
        Self {
            id: course.id().to_string(),
            department_id: course.department_id().map(|id| id.to_string()),
            course_code: course.course_code().to_owned(),
            course_name: course.course_name().to_owned(),
            description: course.description().map(ToOwned::to_owned),
            instructor_id: course.instructor_id().to_string(),
            max_students: course.max_students(),
        }
    }
}

/// A course with its live enrollment count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummaryBody {
    /// The course record.
    #[serde(flatten)]
    pub course: CourseBody,
    /// Number of active enrollments at read time.
    pub enrolled_count: i64,
    /// Remaining seats, saturating at zero.
    pub seats_remaining: i64,
}

impl From<CourseSummary> for CourseSummaryBody {
    fn from(summary: CourseSummary) -> Self {
        let seats_remaining = summary.seats_remaining();
        Self {
            course: CourseBody::from(summary.course),
            enrolled_count: summary.enrolled_count,
            seats_remaining,
        }
    }
}

fn map_course_validation_error(err: CourseValidationError) -> Error {
    let field = match err {
        CourseValidationError::EmptyCode
        | CourseValidationError::CodeTooLong { .. }
        | CourseValidationError::CodeInvalidCharacters => "courseCode",
        CourseValidationError::EmptyName | CourseValidationError::NameTooLong { .. } => {
            "courseName"
        }
        CourseValidationError::NonPositiveCapacity => "maxStudents",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_course_repository_error(err: CourseRepositoryError) -> Error {
    match err {
        CourseRepositoryError::DuplicateCode { code } => {
            Error::conflict(format!("Course code {code} already exists"))
        }
        CourseRepositoryError::Connection { message }
        | CourseRepositoryError::Query { message } => {
            tracing::error!(error = %message, "course repository failed");
            Error::service_unavailable("Course catalogue is unavailable")
        }
    }
}

/// List the catalogue with live enrollment counts.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Catalogue courses", body = [CourseSummaryBody]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses",
    security(("SessionCookie" = []))
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseSummaryBody>>> {
    session.require_identity()?;

    let summaries = state
        .courses
        .list_with_enrollment_counts()
        .await
        .map_err(map_course_repository_error)?;

    Ok(web::Json(
        summaries.into_iter().map(CourseSummaryBody::from).collect(),
    ))
}

/// Fetch a single course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{courseId}",
    params(
        ("courseId" = String, Path, description = "Course to fetch")
    ),
    responses(
        (status = 200, description = "Course", body = CourseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Course not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "getCourse",
    security(("SessionCookie" = []))
)]
#[get("/courses/{courseId}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseBody>> {
    session.require_identity()?;
    let course_id = parse_uuid(&path.into_inner(), FieldName::new("courseId"))?;

    let course = state
        .courses
        .find_by_id(course_id)
        .await
        .map_err(map_course_repository_error)?
        .ok_or_else(|| Error::not_found("Course not found"))?;

    Ok(web::Json(CourseBody::from(course)))
}

/// Create a course owned by the authenticated instructor.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequestBody,
    responses(
        (status = 201, description = "Course created", body = CourseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Forbidden", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Duplicate course code", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "createCourse",
    security(("SessionCookie" = []))
)]
#[post("/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCourseRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    actor.require_role(Role::Instructor)?;

    let CreateCourseRequestBody {
        course_code,
        course_name,
        description,
        department_id,
        max_students,
    } = payload.into_inner();

    let department_id = department_id
        .map(|raw| parse_uuid(&raw, FieldName::new("departmentId")))
        .transpose()?;

    let course = Course::new(CourseDraft {
        id: Uuid::new_v4(),
        department_id,
        course_code,
        course_name,
        description,
        instructor_id: *actor.id(),
        max_students,
    })
    .map_err(map_course_validation_error)?;

    state
        .courses
        .create(&course)
        .await
        .map_err(map_course_repository_error)?;

    Ok(HttpResponse::Created().json(CourseBody::from(course)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_state, login_and_get_cookie};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

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
                    .service(list_courses)
                    .service(create_course)
                    .service(get_course),
            )
    }

    fn course_payload() -> Value {
        serde_json::json!({
            "courseCode": "CS-240",
            "courseName": "Programming in Rust",
            "description": "Ownership, borrowing, fearless concurrency.",
            "maxStudents": 30,
        })
    }

    #[actix_web::test]
    async fn instructors_create_courses() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "instructor").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/courses")
            .cookie(cookie)
            .set_json(course_payload())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("courseCode").and_then(Value::as_str),
            Some("CS-240")
        );
        assert!(body.get("id").is_some());
    }

    #[rstest]
    #[case("student")]
    #[case("admin")]
    #[actix_web::test]
    async fn course_creation_rejects_other_roles(#[case] username: &str) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, username).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/courses")
            .cookie(cookie)
            .set_json(course_payload())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn course_creation_validates_capacity() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "instructor").await;

        let mut payload = course_payload();
        payload["maxStudents"] = serde_json::json!(0);
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/courses")
            .cookie(cookie)
            .set_json(payload)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("maxStudents")
        );
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = actix_test::init_service(test_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn missing_course_maps_to_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_and_get_cookie(&app, "student").await;

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Course not found")
        );
    }
}
