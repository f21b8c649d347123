//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting and retrieving the resolved
//! `(user id, role)` identity. Handlers perform role capability checks
//! themselves via [`AuthenticatedUser::require_role`]; the domain services
//! never see session state.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthenticatedUser, Error, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the resolved identity in the session cookie.
    pub fn persist_identity(&self, actor: &AuthenticatedUser) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, actor.id().to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, actor.role().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present and intact.
    pub fn identity(&self) -> Result<Option<AuthenticatedUser>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };

        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };

        let id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("invalid user id in session cookie: {error}");
                return Ok(None);
            }
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                tracing::warn!("invalid role in session cookie: {error}");
                return Ok(None);
            }
        };
        Ok(Some(AuthenticatedUser::new(id, role)))
    }

    /// Require a resolved identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<AuthenticatedUser, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
