//! Shared translation from Diesel and pool failures to port error variants.
//!
//! Adapters own richer mappings (e.g. unique violations becoming business
//! outcomes); these helpers cover the distinction every adapter needs:
//! connection-level failures versus query failures.

use diesel::result::DatabaseErrorKind;

use super::pool::PoolError;

/// Map a pool failure into an adapter's connection error variant.
pub(crate) fn map_basic_pool_error<E>(
    error: PoolError,
    connection: impl FnOnce(String) -> E,
) -> E {
    connection(error.to_string())
}

/// Map a Diesel failure into an adapter's query or connection error variant.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match error {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        diesel::result::Error::BrokenTransactionManager => {
            connection("transaction manager is broken".to_owned())
        }
        other => query(other.to_string()),
    }
}

/// Whether the failure is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn unique_violation() -> diesel::result::Error {
        diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        )
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_basic_pool_error(PoolError::checkout("refused"), |message| message);
        assert!(mapped.contains("refused"));
    }

    #[rstest]
    fn broken_transaction_manager_maps_to_connection() {
        let mapped = map_basic_diesel_error(
            diesel::result::Error::BrokenTransactionManager,
            |_| "query",
            |_| "connection",
        );
        assert_eq!(mapped, "connection");
    }

    #[rstest]
    fn other_errors_map_to_query() {
        let mapped = map_basic_diesel_error(
            diesel::result::Error::NotFound,
            |_| "query",
            |_| "connection",
        );
        assert_eq!(mapped, "query");
    }

    #[rstest]
    fn unique_violations_are_detected() {
        assert!(is_unique_violation(&unique_violation()));
        assert!(!is_unique_violation(&diesel::result::Error::NotFound));
    }
}
