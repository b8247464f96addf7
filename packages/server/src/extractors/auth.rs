use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};

use crate::error::AppError;
use crate::state::AppState;

/// Caller authenticated through the `Authorization: Basic` header.
///
/// Add this as a handler parameter to require the configured credentials.
/// The check runs on every request; there is no session.
#[derive(Debug)]
pub struct AdminUser {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .typed_get::<Authorization<Basic>>()
            .ok_or(AppError::CredentialsMissing)?;

        if !state
            .credentials
            .verify(credentials.username(), credentials.password())
        {
            tracing::warn!(username = credentials.username(), "Rejected basic-auth credentials");
            return Err(AppError::InvalidCredentials);
        }

        Ok(AdminUser {
            username: credentials.username().to_string(),
        })
    }
}
