use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The `(codigo, turno, dia)` unique key rejected the insert.
    #[error("record already exists for this employee, shift and day")]
    ConstraintViolation,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("El empleado ya se registró hoy en este turno")]
    Duplicate,

    #[error(transparent)]
    Storage(StorageError),

    #[error("failed to build spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConstraintViolation => ServiceError::Duplicate,
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Widest `codigo`/`turno` the `VARCHAR` columns hold, in characters.
pub const MAX_FIELD_LEN: usize = 64;

/// Trims `value` and rejects it when nothing is left or it would not fit
/// its column.
pub fn require<'a>(field: &str, value: &'a str) -> ServiceResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!(
            "El campo '{field}' es obligatorio"
        )));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ServiceError::Validation(format!(
            "El campo '{field}' admite como máximo {MAX_FIELD_LEN} caracteres"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_becomes_duplicate() {
        let err: ServiceError = StorageError::ConstraintViolation.into();
        assert!(matches!(err, ServiceError::Duplicate));
    }

    #[test]
    fn database_failures_stay_storage_errors() {
        let err: ServiceError = StorageError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("codigo", "  E-1 ").unwrap(), "E-1");
        assert!(matches!(
            require("turno", "   "),
            Err(ServiceError::Validation(msg)) if msg.contains("turno")
        ));
    }

    #[test]
    fn require_counts_characters_not_bytes() {
        let widest = "ñ".repeat(MAX_FIELD_LEN);
        assert_eq!(require("turno", &widest).unwrap(), widest);

        let too_long = "x".repeat(MAX_FIELD_LEN + 1);
        assert!(matches!(
            require("codigo", &too_long),
            Err(ServiceError::Validation(msg)) if msg.contains("64")
        ));
    }
}
