use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    auth::{require_role, Role, Session},
    models::{AdminLoginReq, GenericResponse, SessionResponse},
    state::AppState,
    utils::{AppError, ValidatedBody},
};

/// Admin login
///
/// Username and password login against the configured admin credentials
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginReq,
    responses(
        (status = 200, description = "Admin session issued", body = SessionResponse),
        (status = 401, description = "Invalid username or password", body = crate::models::ErrorResponse)
    ),
    tag = "Admin API"
)]
pub async fn admin_login_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<AdminLoginReq>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .issue_admin_session(body.username.trim(), &body.password)
        .map_err(|err| {
            tracing::warn!("Failed admin login for {}", body.username.trim());
            AppError::Session(err)
        })?;
    tracing::info!("Admin {} logged in", body.username.trim());
    Ok(Json(SessionResponse::new(session, None)))
}

/// Admin logout
///
/// Revokes the presented token
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logged out", body = GenericResponse),
        (status = 401, description = "Invalid token", body = crate::models::ErrorResponse),
        (status = 403, description = "Not an admin session", body = crate::models::ErrorResponse)
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn admin_logout_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<GenericResponse>, AppError> {
    require_role(&session.claims, Role::Admin).map_err(AppError::Session)?;
    state.sessions.revoke(&session.token, &session.claims);
    let res = GenericResponse {
        success: true,
        message: "Logged out successfully".to_owned(),
    };
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, http::StatusCode, routing::post, Router};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::{database::MockAppDatabase, models::ErrorResponse, state::test_support::*};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/admin/login", post(admin_login_handler))
            .route("/api/admin/logout", post(admin_logout_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_admin_login_wrong_password() {
        let state = test_state(MockAppDatabase::default());
        let body = json!({"username": ADMIN_USER, "password": "wrongpass"});
        let req = build_request(Method::POST, "/api/admin/login", None, Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res: ErrorResponse = read_json(res).await;
        assert_eq!(res.code, "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_admin_login_then_logout() {
        let state = test_state(MockAppDatabase::default());
        let body = json!({"username": ADMIN_USER, "password": ADMIN_PASS});
        let req = build_request(Method::POST, "/api/admin/login", None, Some(body));
        let res = app(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: SessionResponse = read_json(res).await;
        assert_eq!(res.role, Role::Admin);
        let token = res.token;
        assert!(state.sessions.validate(&token).is_ok());

        let req = build_request(Method::POST, "/api/admin/logout", Some(&token), None);
        let res = app(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(state.sessions.validate(&token).is_err());

        let req = build_request(Method::POST, "/api/admin/logout", Some(&token), None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_villager_can_not_use_admin_logout() {
        let state = test_state(MockAppDatabase::default());
        let token = villager_token(&state, &sample_villager(1));
        let req = build_request(Method::POST, "/api/admin/logout", Some(&token), None);
        let res = app(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(state.sessions.validate(&token).is_ok());
    }
}
