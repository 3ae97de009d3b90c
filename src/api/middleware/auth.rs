//! Authentication extractors backed by the token resolver

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::state::{ProductAppState, UserAppState};
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::infrastructure::auth::Principal;

/// Extractor that requires an authenticated, active account.
///
/// The access cookie is tried first, then `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<UserAppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &UserAppState,
    ) -> Result<Self, Self::Rejection> {
        let user = state.resolver.resolve(&parts.headers).await?;
        Ok(RequireUser(user))
    }
}

/// Extractor for the catalog service; identity comes from token claims
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Principal);

impl FromRequestParts<ProductAppState> for RequireIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ProductAppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = state.resolver.resolve(&parts.headers).await?;
        Ok(RequireIdentity(principal))
    }
}
