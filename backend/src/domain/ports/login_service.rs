//! Driving port for the identity boundary.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! resolve credentials into a `(user id, role)` pair without knowing (or
//! importing) the backing identity provider. Credential validation, token
//! issuance, and password storage all live behind this boundary.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, Role, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve credentials to an authenticated identity.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}

/// Development accounts resolved by [`FixtureLoginService`], one per role.
const FIXTURE_ACCOUNTS: [(&str, Role, &str); 3] = [
    (
        "student",
        Role::Student,
        "8c5f1f6e-0f0a-4c2b-9d87-d2a4f7e3b101",
    ),
    (
        "instructor",
        Role::Instructor,
        "2b9d4a7c-6e1f-4f3a-8b02-91c5d8e4a202",
    ),
    ("admin", Role::Admin, "5e7a3c9b-1d4f-4a6e-b813-76f2c0d9e303"),
];

/// Temporary in-memory identity provider used until a real one is wired.
///
/// Each role has one well-known development account whose username doubles
/// as its role name; the shared password is `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        if credentials.password() != "password" {
            return Err(Error::unauthorized("invalid credentials"));
        }

        let account = FIXTURE_ACCOUNTS
            .iter()
            .find(|(username, _, _)| *username == credentials.username());
        match account {
            Some((_, role, id)) => {
                let id = UserId::new(id)
                    .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
                Ok(AuthenticatedUser::new(id, *role))
            }
            None => Err(Error::unauthorized("invalid credentials")),
        }
    }
}
