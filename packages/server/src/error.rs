use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use recetario_common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `CREDENTIALS_MISSING`, `INVALID_CREDENTIALS`, `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description, under the same key FastAPI clients read.
    #[schema(example = "Receta no encontrada")]
    pub detail: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// No usable `Authorization: Basic` header.
    CredentialsMissing,
    InvalidCredentials,
    NotFound(String),
    Internal(String),
}

impl AppError {
    /// 401 responses carry a basic-auth challenge.
    fn requires_challenge(&self) -> bool {
        matches!(self, AppError::CredentialsMissing | AppError::InvalidCredentials)
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    detail: msg,
                },
            ),
            AppError::CredentialsMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "CREDENTIALS_MISSING",
                    detail: "Se requieren credenciales".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    detail: "Credenciales inválidas".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    detail: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        detail: "Ha ocurrido un error inesperado".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let challenge = self.requires_challenge();
        let (status, body) = self.status_and_body();

        if challenge {
            (status, [(header::WWW_AUTHENTICATE, "Basic")], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit, .. } => AppError::Validation(format!(
                "La imagen supera el tamaño máximo de {limit} bytes"
            )),
            other => AppError::Internal(other.to_string()),
        }
    }
}
