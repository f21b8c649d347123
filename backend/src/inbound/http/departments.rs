//! Department API handlers.
//!
//! ```text
//! GET /api/v1/departments
//! POST /api/v1/departments
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::DepartmentRepositoryError;
use crate::domain::{Department, DepartmentDraft, DepartmentValidationError, Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for creating a department.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequestBody {
    /// Unique department code, e.g. `CS`.
    pub code: String,
    /// Human-readable department name.
    pub name: String,
}

/// A department as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBody {
    /// Department identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Unique department code.
    pub code: String,
    /// Human-readable department name.
    pub name: String,
}

impl From<Department> for DepartmentBody {
    fn from(department: Department) -> Self {
        Self {
            id: department.id().to_string(),
            code: department.code().to_owned(),
            name: department.name().to_owned(),
        }
    }
}

fn map_department_validation_error(err: DepartmentValidationError) -> Error {
    let field = match err {
        DepartmentValidationError::EmptyCode
        | DepartmentValidationError::CodeTooLong { .. }
        | DepartmentValidationError::CodeInvalidCharacters => "code",
        DepartmentValidationError::EmptyName | DepartmentValidationError::NameTooLong { .. } => {
            "name"
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_department_repository_error(err: DepartmentRepositoryError) -> Error {
    match err {
        DepartmentRepositoryError::DuplicateCode { code } => {
            Error::conflict(format!("Department code {code} already exists"))
        }
        DepartmentRepositoryError::Connection { message }
        | DepartmentRepositoryError::Query { message } => {
            tracing::error!(error = %message, "department repository failed");
            Error::service_unavailable("Department directory is unavailable")
        }
    }
}

/// List departments ordered by code.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments", body = [DepartmentBody]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "listDepartments",
    security(("SessionCookie" = []))
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DepartmentBody>>> {
    session.require_identity()?;

    let departments = state
        .departments
        .list()
        .await
        .map_err(map_department_repository_error)?;

    Ok(web::Json(
        departments.into_iter().map(DepartmentBody::from).collect(),
    ))
}

/// Create a department; administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentRequestBody,
    responses(
        (status = 201, description = "Department created", body = DepartmentBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Forbidden", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Duplicate department code", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "createDepartment",
    security(("SessionCookie" = []))
)]
#[post("/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDepartmentRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    actor.require_role(Role::Admin)?;

    let CreateDepartmentRequestBody { code, name } = payload.into_inner();
    let department = Department::new(DepartmentDraft {
        id: Uuid::new_v4(),
        code,
        name,
    })
    .map_err(map_department_validation_error)?;

    state
        .departments
        .create(&department)
        .await
        .map_err(map_department_repository_error)?;

    Ok(HttpResponse::Created().json(DepartmentBody::from(department)))
}
