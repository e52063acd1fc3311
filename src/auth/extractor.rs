use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use super::{
    credentials::Role,
    session::{require_role, AuthError, SessionClaims},
};
use crate::{
    constants::*,
    state::AppState,
    utils::{constant_time_eq, AppError},
};

/// Extracts the bearer token from the authorization header.
/// Both `Bearer <token>` and the bare token are accepted.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match authorization.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        Some(_) => return None,
        None => authorization,
    };
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Token presented by the caller together with its validated claims
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub claims: SessionClaims,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(AppError::Session(AuthError::MissingToken))?
            .to_owned();
        let claims = state
            .sessions
            .validate(&token)
            .map_err(AppError::Session)?;
        Ok(Self { token, claims })
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for SessionClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(session.claims)
    }
}

/// Claims of a validated admin session
#[derive(Debug, Clone)]
pub struct AdminClaims(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = SessionClaims::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Admin).map_err(AppError::Session)?;
        Ok(Self(claims))
    }
}

/// Claims of a validated villager session
#[derive(Debug, Clone)]
pub struct VillagerClaims(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for VillagerClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = SessionClaims::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Villager).map_err(AppError::Session)?;
        Ok(Self(claims))
    }
}

/// Guard for sensor uplinks, checks the shared ingest key
#[derive(Debug)]
pub struct IngestKey;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for IngestKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.ingest_api_key.as_deref() else {
            let err = AppError::Auth("Sensor ingest is not enabled".into());
            return Err(err);
        };
        let presented = parts
            .headers
            .get(INGEST_KEY_HEADER)
            .and_then(|val| val.to_str().ok())
            .ok_or(AppError::Auth("Missing ingest key".into()))?;
        if !constant_time_eq(presented, expected) {
            return Err(AppError::Auth("Invalid ingest key".into()));
        }
        Ok(Self)
    }
}
