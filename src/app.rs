use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    BoxError, Json, Router,
};
use std::{any::Any, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppConfig, constants::*, handlers::*, models::ErrorResponse, state::AppState,
    swagger::ApiDoc,
};

pub fn build_app(state: Arc<AppState>) -> Router {
    tracing::debug!("Initializing the app");
    let cors = cors_layer(&state.config);
    let middleware = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(HandleErrorLayer::new(handle_timeout_error))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(default_route_handler))
        .nest("/api", api_routes())
        .fallback(global_404_handler)
        .layer(middleware)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/login", post(aadhaar_login_handler))
        .nest("/verify", verify_routes())
        .route("/auth/validate", get(validate_token_handler))
        .route("/profile", get(profile_handler))
        .nest("/admin", admin_routes())
        .nest("/villagers", villager_routes())
        .nest("/sensors", sensor_routes())
        .route("/my-sensors", get(my_sensors_handler))
}

fn verify_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/check-phone", post(check_phone_handler))
        .route("/send-otp", post(send_otp_handler))
        .route("/resend-otp", post(resend_otp_handler))
        .route("/check-otp", post(check_otp_handler))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(admin_login_handler))
        .route("/logout", post(admin_logout_handler))
        .route("/dashboard", get(dashboard_handler))
}

fn villager_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_villagers_handler).post(create_villager_handler))
        .route(
            "/:id",
            get(get_villager_handler)
                .put(update_villager_handler)
                .delete(delete_villager_handler),
        )
}

fn sensor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_sensors_handler).post(create_sensor_handler))
        .route(
            "/:dev_eui",
            get(get_sensor_handler)
                .put(update_sensor_handler)
                .delete(delete_sensor_handler),
        )
        .route("/:dev_eui/readings", post(report_reading_handler))
}

/// Explicit origins from the config, any origin when none are configured
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(AnyOrigin)
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(INGEST_KEY_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        let msg = format!("Request did not complete within {REQUEST_TIMEOUT_SECS} seconds");
        let res = ErrorResponse::new(msg, "REQUEST_TIMEOUT");
        return (StatusCode::REQUEST_TIMEOUT, Json(res));
    }
    tracing::error!("Unhandled middleware error: {err}");
    let res = ErrorResponse::new("Something went wrong".to_owned(), "INTERNAL_ERROR");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(res))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "Unknown panic message".to_owned()
    };
    tracing::error!("Handler panicked: {details}");
    let res = ErrorResponse::new("Something went wrong".to_owned(), "INTERNAL_ERROR");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(res)).into_response()
}
