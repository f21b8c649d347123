//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities and use-cases of the course
//! portal, independent of HTTP and persistence. Keep types immutable and
//! document invariants in each type's Rustdoc. Adapters on both sides talk
//! to this module through the traits in [`ports`].

pub mod course;
pub mod department;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod identity;
pub mod ports;
pub mod trace_id;

pub use self::course::{Course, CourseDraft, CourseSummary, CourseValidationError};
pub use self::department::{Department, DepartmentDraft, DepartmentValidationError};
pub use self::enrollment::{
    Enrollment, EnrollmentError, EnrollmentStatus, EnrollmentView, ParseEnrollmentStatusError,
};
pub use self::enrollment_service::{EnrollmentCommandService, EnrollmentQueryService};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity::{
    AuthenticatedUser, IdentityValidationError, LoginCredentials, LoginValidationError, Role,
    UserId,
};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
