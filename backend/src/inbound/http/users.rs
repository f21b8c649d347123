//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"student","password":"password"}
//! GET /api/v1/me
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Resolved identity returned by login and `GET /me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    /// Stable user identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Portal role: `student`, `instructor`, or `admin`.
    pub role: String,
}

impl From<AuthenticatedUser> for IdentityBody {
    fn from(actor: AuthenticatedUser) -> Self {
        Self {
            id: actor.id().to_string(),
            role: actor.role().as_str().to_owned(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate the caller and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = IdentityBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["identity"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<IdentityBody>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let actor = state.login.authenticate(&credentials).await?;
    session.persist_identity(&actor)?;
    Ok(web::Json(IdentityBody::from(actor)))
}

/// Return the session's resolved identity.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityBody),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["identity"],
    operation_id = "currentIdentity",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn current_identity(session: SessionContext) -> ApiResult<web::Json<IdentityBody>> {
    let actor = session.require_identity()?;
    Ok(web::Json(IdentityBody::from(actor)))
}
