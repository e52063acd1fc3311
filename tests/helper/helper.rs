use axum::{body::Body, http::Request, response::Response, Router};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use smart_panchayat_backend::{
    app::build_app, config::AppConfig, database::AppDatabase, state::AppState,
};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "correctpass";
pub const ADMIN_AADHAAR: &str = "999999999999";

/// The app wired with a database client which connects lazily,
/// so routes which never touch the database run without a server
pub async fn test_app() -> Router {
    let config = AppConfig {
        admin_credentials: format!("{ADMIN_USER}:{ADMIN_PASS}"),
        admin_aadhaar: Some(ADMIN_AADHAAR.to_owned()),
        ..Default::default()
    };
    let db_client = AppDatabase::new(&config)
        .await
        .expect("Unable to accquire database client");
    let state = AppState::new(config, Arc::new(db_client)).expect("Unable to build app state");
    build_app(state)
}

pub fn build_post_request(path: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .uri(path)
        .method("POST")
        .header("Content-Type", "application/json");
    let builder = if let Some(token) = token {
        builder.header("Authorization", format!("Bearer {token}"))
    } else {
        builder
    };
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub fn build_get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().uri(path);
    let builder = if let Some(token) = token {
        builder.header("Authorization", format!("Bearer {token}"))
    } else {
        builder
    };
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(res: Response) -> T {
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
