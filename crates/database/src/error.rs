use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a service operation. `BadRequest` covers validation failures
/// (missing referenced entity, out-of-window due date), `NotFound` covers
/// missing or empty resources. The message text is part of the API contract.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}
