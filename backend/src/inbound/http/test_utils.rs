//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    FixtureCourseRepository, FixtureDepartmentRepository, FixtureEnrollmentCommand,
    FixtureEnrollmentQuery, FixtureLoginService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state backed entirely by fixture ports.
pub fn fixture_state() -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        enrollments: Arc::new(FixtureEnrollmentCommand),
        enrollments_query: Arc::new(FixtureEnrollmentQuery),
        courses: Arc::new(FixtureCourseRepository),
        departments: Arc::new(FixtureDepartmentRepository),
    })
}

/// Log in through the fixture identity provider and return the session
/// cookie. The app must have `users::login` mounted under `/api/v1`.
pub async fn login_and_get_cookie<S>(
    app: &S,
    username: &str,
) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let login_req = actix_web::test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "username": username,
            "password": "password",
        }))
        .to_request();
    let login_res = actix_web::test::call_service(app, login_req).await;
    assert!(login_res.status().is_success());
    login_res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}
