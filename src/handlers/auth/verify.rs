use axum::{extract::State, Json};
use mongodb::bson::doc;
use std::sync::Arc;

use super::otp::deliver_otp;
use crate::{
    handlers::villager::helper::{active_villager, villager_by_id},
    models::{CheckOtpReq, GenericResponse, OtpSentResponse, PhoneReq, SessionResponse},
    state::AppState,
    utils::{AppError, ValidatedBody},
};

const PHONE_NOT_REGISTERED: &str = "Phone number is not registered";

/// Check phone
///
/// Succeeds when an active villager is registered with the phone number
#[utoipa::path(
    post,
    path = "/api/verify/check-phone",
    request_body = PhoneReq,
    responses(
        (status = 200, description = "Phone is registered", body = GenericResponse),
        (status = 404, description = "Phone is not registered", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API"
)]
pub async fn check_phone_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<PhoneReq>,
) -> Result<Json<GenericResponse>, AppError> {
    let filter = doc! {"phone": &body.phone};
    active_villager(&state.db, filter, PHONE_NOT_REGISTERED).await?;
    let res = GenericResponse {
        success: true,
        message: "Phone number is registered".to_owned(),
    };
    Ok(Json(res))
}

/// Send otp
///
/// Generates an otp for a registered phone and sends it by SMS
#[utoipa::path(
    post,
    path = "/api/verify/send-otp",
    request_body = PhoneReq,
    responses(
        (status = 200, description = "Otp sent", body = OtpSentResponse),
        (status = 404, description = "Phone is not registered", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API"
)]
pub async fn send_otp_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<PhoneReq>,
) -> Result<Json<OtpSentResponse>, AppError> {
    issue_otp(&state, &body.phone, "OTP sent").await
}

/// Resend otp
///
/// Any otp sent earlier to the phone stops working
#[utoipa::path(
    post,
    path = "/api/verify/resend-otp",
    request_body = PhoneReq,
    responses(
        (status = 200, description = "Otp sent", body = OtpSentResponse),
        (status = 404, description = "Phone is not registered", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API"
)]
pub async fn resend_otp_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<PhoneReq>,
) -> Result<Json<OtpSentResponse>, AppError> {
    issue_otp(&state, &body.phone, "OTP resent").await
}

async fn issue_otp(
    state: &AppState,
    phone: &str,
    message: &str,
) -> Result<Json<OtpSentResponse>, AppError> {
    let filter = doc! {"phone": phone};
    let villager = active_villager(&state.db, filter, PHONE_NOT_REGISTERED).await?;
    let otp = state.otps.issue(phone, villager.id);
    deliver_otp(state, phone, &otp).await?;
    let res = OtpSentResponse {
        success: true,
        message: message.to_owned(),
        expires_in: state.otps.validity(),
        otp: state.config.expose_otp.then_some(otp),
    };
    Ok(Json(res))
}

/// Check otp
///
/// A correct otp is consumed and a villager session is issued.
/// The otp is locked after 3 wrong attempts.
#[utoipa::path(
    post,
    path = "/api/verify/check-otp",
    request_body = CheckOtpReq,
    responses(
        (status = 200, description = "Otp verified", body = SessionResponse),
        (status = 401, description = "Wrong or expired otp", body = crate::models::ErrorResponse),
        (status = 404, description = "No active otp for the phone", body = crate::models::ErrorResponse),
        (status = 429, description = "Too many failed attempts", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API"
)]
pub async fn check_otp_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<CheckOtpReq>,
) -> Result<Json<SessionResponse>, AppError> {
    let villager_id = state
        .otps
        .verify(&body.phone, &body.otp)
        .map_err(AppError::Otp)?;
    let villager = villager_by_id(&state.db, villager_id).await?;
    let session = state
        .sessions
        .issue_villager_session((&villager).into())
        .map_err(AppError::Session)?;
    tracing::debug!("Villager {villager_id} logged in with otp");
    Ok(Json(SessionResponse::new(session, Some(villager))))
}
