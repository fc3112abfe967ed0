use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to the caller. Every variant keeps its kind
/// distinguishable on the wire; storage failures propagate unmodified and
/// are never retried here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Referenced entity does not exist at write time
    #[error("{0}")]
    NotFound(String),

    /// Input violates a field constraint, caught before any storage call
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation reported by the store
    #[error("{0}")]
    Conflict(String),

    /// Any other failure from the record store
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::Storage(_) => "storage",
        }
    }

    fn status(&self) -> Status {
        match self {
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Storage(_) => Status::InternalServerError,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ApiError::Conflict(info.message().to_string())
            }
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        if let ApiError::Storage(msg) = &self {
            log::error!("storage error on {}: {}", req.uri(), msg);
        }
        let status = self.status();
        let body = Json(serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_conflict() {
        use diesel::result::{DatabaseErrorKind, Error};
        let err = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: forklifts.unit_number".to_string()),
        );
        let api: ApiError = err.into();
        assert_eq!(api.kind(), "conflict");
    }

    #[test]
    fn other_database_errors_map_to_storage() {
        let api: ApiError = diesel::result::Error::NotFound.into();
        assert_eq!(api.kind(), "storage");
    }
}
