//! Shared Diesel error classification for every repository.
//!
//! Failures are first reduced to a [`DbFailure`], then converted into the
//! port error of the calling repository. Connection loss and serialisation
//! races become the transient variants the domain retry policy acts on.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    FollowRepositoryError, PortfolioRepositoryError, PostRepositoryError, SearchRepositoryError,
    SitemapRepositoryError, UserRepositoryError,
};

use super::pool::PoolError;

/// Backend-neutral shape of a database failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The pool or the connection is unusable.
    Connection(String),
    /// Serialisation failure or deadlock; safe to retry.
    Contention(String),
    /// A unique index rejected the write.
    Unique {
        /// Violated constraint or index.
        constraint: String,
    },
    /// Anything else, including undecodable rows.
    Query(String),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                _,
            ) => Self::Connection("database connection error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                Self::Contention("serialization failure".to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Self::Unique {
                constraint: info.constraint_name().unwrap_or("unknown").to_owned(),
            },
            DieselError::DatabaseError(_, info) => match transient_state(&*info) {
                Some(TransientState::Contention(label)) => Self::Contention(label.to_owned()),
                Some(TransientState::Connection(label)) => Self::Connection(label.to_owned()),
                None => Self::Query("database error".to_owned()),
            },
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

/// Retryable failure recognised from a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransientState {
    /// Serialisation failure (40001), deadlock (40P01), or unknown statement
    /// completion (40003).
    Contention(&'static str),
    /// Connection exception (class 08) or timeout.
    Connection(&'static str),
}

/// Message fragments PostgreSQL emits for retryable SQLSTATEs that Diesel
/// reports as `DatabaseErrorKind::Unknown`. Matched case-insensitively
/// against the message and detail text.
const TRANSIENT_FRAGMENTS: &[(&str, TransientState)] = &[
    ("could not serialize access", TransientState::Contention("serialization failure")),
    ("deadlock detected", TransientState::Contention("deadlock detected")),
    (
        "statement completion unknown",
        TransientState::Contention("statement completion unknown"),
    ),
    ("sqlstate 40001", TransientState::Contention("serialization failure")),
    ("sqlstate 40p01", TransientState::Contention("deadlock detected")),
    ("sqlstate 40003", TransientState::Contention("statement completion unknown")),
    ("connection failure", TransientState::Connection("connection failure")),
    ("could not connect", TransientState::Connection("connection failure")),
    ("connection does not exist", TransientState::Connection("connection failure")),
    ("server closed the connection", TransientState::Connection("connection failure")),
    ("terminating connection", TransientState::Connection("connection failure")),
    ("protocol violation", TransientState::Connection("connection failure")),
    ("sqlstate 08", TransientState::Connection("connection failure")),
    ("timed out", TransientState::Connection("database timeout")),
    ("timeout", TransientState::Connection("database timeout")),
];

fn transient_state(
    info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync),
) -> Option<TransientState> {
    let message = info.message().to_ascii_lowercase();
    let details = info.details().map(str::to_ascii_lowercase);
    TRANSIENT_FRAGMENTS
        .iter()
        .find(|(fragment, _)| {
            message.contains(fragment)
                || details
                    .as_deref()
                    .is_some_and(|detail| detail.contains(fragment))
        })
        .map(|(_, state)| *state)
}

/// Reduce a pool checkout failure.
pub(crate) fn map_pool_error(error: PoolError) -> DbFailure {
    DbFailure::from(error)
}

/// Reduce a Diesel failure.
pub(crate) fn map_diesel_error(error: DieselError) -> DbFailure {
    DbFailure::from(error)
}

/// Reduce an undecodable row.
pub(crate) fn map_row_error(message: String) -> DbFailure {
    DbFailure::Query(message)
}

impl From<DbFailure> for UserRepositoryError {
    fn from(failure: DbFailure) -> Self {
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            DbFailure::Contention(message) => Self::contention(message),
            DbFailure::Unique { constraint } => Self::duplicate(constraint),
            DbFailure::Query(message) => Self::query(message),
        }
    }
}

/// Implements `From<DbFailure>` for ports that treat unique violations as
/// plain query failures.
macro_rules! from_db_failure {
    ($error:ty, contention) => {
        impl From<DbFailure> for $error {
            fn from(failure: DbFailure) -> Self {
                match failure {
                    DbFailure::Connection(message) => Self::connection(message),
                    DbFailure::Contention(message) => Self::contention(message),
                    DbFailure::Unique { constraint } => {
                        Self::query(format!("unique violation on {constraint}"))
                    }
                    DbFailure::Query(message) => Self::query(message),
                }
            }
        }
    };
    ($error:ty) => {
        impl From<DbFailure> for $error {
            fn from(failure: DbFailure) -> Self {
                match failure {
                    DbFailure::Connection(message) => Self::connection(message),
                    DbFailure::Contention(message) => Self::query(message),
                    DbFailure::Unique { constraint } => {
                        Self::query(format!("unique violation on {constraint}"))
                    }
                    DbFailure::Query(message) => Self::query(message),
                }
            }
        }
    };
}

from_db_failure!(FollowRepositoryError, contention);
from_db_failure!(PostRepositoryError, contention);
from_db_failure!(PortfolioRepositoryError, contention);
from_db_failure!(SearchRepositoryError);
from_db_failure!(SitemapRepositoryError);

#[cfg(test)]
mod tests {
    //! Classification coverage for Diesel and pool failures.
    use super::*;
    use crate::domain::Transient;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info {
        message: &'static str,
        details: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            self.details
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(Info {
                message,
                details: None,
                constraint: Some("users_username_lower_key"),
            }),
        )
    }

    fn post_error(error: DieselError) -> PostRepositoryError {
        map_diesel_error(error).into()
    }

    #[rstest]
    #[case::closed_connection(DatabaseErrorKind::ClosedConnection, "gone", true)]
    #[case::serialization_40001(DatabaseErrorKind::SerializationFailure, "could not serialize", true)]
    #[case::serialization_message(
        DatabaseErrorKind::Unknown,
        "could not serialize access due to concurrent update",
        true
    )]
    #[case::deadlock_40p01(DatabaseErrorKind::Unknown, "deadlock detected", true)]
    #[case::completion_unknown_40003(DatabaseErrorKind::Unknown, "statement completion unknown", true)]
    #[case::connection_failure_08006(
        DatabaseErrorKind::Unknown,
        "terminating connection due to unexpected client disconnect",
        true
    )]
    #[case::connection_missing_08003(DatabaseErrorKind::Unknown, "connection does not exist", true)]
    #[case::cannot_connect_08001(DatabaseErrorKind::Unknown, "could not connect to server", true)]
    #[case::protocol_violation_08p01(DatabaseErrorKind::Unknown, "protocol violation", true)]
    #[case::statement_timeout(
        DatabaseErrorKind::Unknown,
        "canceling statement due to statement timeout",
        true
    )]
    #[case::check_violation(DatabaseErrorKind::CheckViolation, "check failed", false)]
    #[case::syntax_error(DatabaseErrorKind::Unknown, "syntax error at or near \"FROM\"", false)]
    fn transient_failures_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] message: &'static str,
        #[case] transient: bool,
    ) {
        assert_eq!(post_error(database_error(kind, message)).is_transient(), transient);
    }

    #[rstest]
    #[case::serialization("SQLSTATE 40001")]
    #[case::deadlock("SQLSTATE 40P01")]
    #[case::completion_unknown("SQLSTATE 40003")]
    #[case::connection_class("SQLSTATE 08006")]
    fn sqlstate_in_details_is_retried(#[case] details: &'static str) {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new(Info {
                message: "transaction aborted",
                details: Some(details),
                constraint: None,
            }),
        );
        assert!(post_error(error).is_transient());
    }

    #[rstest]
    fn completion_unknown_is_contention() {
        let failure = map_diesel_error(database_error(
            DatabaseErrorKind::Unknown,
            "statement completion unknown",
        ));
        assert_eq!(
            failure,
            DbFailure::Contention("statement completion unknown".to_owned())
        );
    }

    #[rstest]
    fn unique_violations_name_the_constraint_for_users() {
        let error: UserRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key",
        ))
        .into();
        assert!(matches!(
            error,
            UserRepositoryError::Duplicate { constraint } if constraint == "users_username_lower_key"
        ));
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let error: SearchRepositoryError = map_pool_error(PoolError::checkout("timed out")).into();
        assert!(matches!(error, SearchRepositoryError::Connection { .. }));
        assert!(error.is_transient());
    }

    #[rstest]
    fn sitemap_contention_is_not_retried() {
        let error: SitemapRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::SerializationFailure,
            "could not serialize",
        ))
        .into();
        assert!(matches!(error, SitemapRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_errors_become_query_failures() {
        let error: PortfolioRepositoryError = map_row_error("bad month".to_owned()).into();
        assert!(matches!(error, PortfolioRepositoryError::Query { .. }));
        assert!(!error.is_transient());
    }
}
