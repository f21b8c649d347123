//! Identity primitives resolved by the external identity boundary.
//!
//! The portal never validates credentials itself: an identity provider
//! resolves an opaque credential to a stable `(user id, role)` pair, and
//! handlers enforce role capabilities before invoking domain services. Keep
//! inbound payload parsing outside the domain by exposing constructors that
//! validate string inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::Error;

/// Validation errors for identity values received from adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// User id was missing or blank.
    EmptyId,
    /// User id was not a valid UUID.
    InvalidId,
    /// Role string did not name a known role.
    UnknownRole { value: String },
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| IdentityValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

/// Portal role resolved by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May enroll in and drop courses.
    Student,
    /// May create and manage courses.
    Instructor,
    /// May manage departments.
    Admin,
}

impl Role {
    /// Stable string form used in sessions and API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(IdentityValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Resolved identity of the caller: a stable id plus its portal role.
///
/// Handlers obtain this from the session and perform the capability check
/// themselves; domain services receive plain identifiers and stay free of
/// identity concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    role: Role,
}

impl AuthenticatedUser {
    /// Bundle a resolved id and role.
    #[must_use]
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Portal role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Require a specific role, failing with `403 Forbidden` otherwise.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{AuthenticatedUser, Role, UserId};
    ///
    /// let actor = AuthenticatedUser::new(UserId::random(), Role::Student);
    /// assert!(actor.require_role(Role::Student).is_ok());
    /// assert!(actor.require_role(Role::Admin).is_err());
    /// ```
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials passed to the identity boundary.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// The password buffer is zeroed on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts("student", "password").unwrap();
    /// assert_eq!(creds.username(), "student");
    /// ```
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Raw password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}
