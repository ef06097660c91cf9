//! Conversions from external infrastructure errors into domain errors.

use ramils_domain::SchedulerError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SchedulerError);

impl From<InfraError> for SchedulerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let mapped = match err {
            RE::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match code.code {
                    ErrorCode::DatabaseBusy => SchedulerError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        SchedulerError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => SchedulerError::Database(format!(
                        "constraint violation (code {}): {}",
                        code.extended_code, message
                    )),
                    _ => SchedulerError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        code.code, code.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                SchedulerError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                SchedulerError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SchedulerError::Database(format!("invalid column type: {ty}"))
            }
            other => SchedulerError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(SchedulerError::Database(format!("connection pool error: {err}")))
    }
}

/// Map a rusqlite error straight into the domain error.
pub fn map_sql_error(err: SqlError) -> SchedulerError {
    SchedulerError::from(InfraError::from(err))
}

/// Map a blocking-task join failure into the domain error.
pub fn map_join_error(err: tokio::task::JoinError) -> SchedulerError {
    SchedulerError::Internal(format!("blocking task failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_becomes_not_found() {
        let mapped = map_sql_error(SqlError::QueryReturnedNoRows);
        assert!(matches!(mapped, SchedulerError::NotFound(_)));
    }

    #[test]
    fn generic_sql_errors_become_database_errors() {
        let mapped = map_sql_error(SqlError::InvalidQuery);
        assert!(matches!(mapped, SchedulerError::Database(_)));
    }
}
