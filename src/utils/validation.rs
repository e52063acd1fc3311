use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::{request::Parts, Request},
    Json, RequestExt,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use super::AppError;
use crate::constants::*;

lazy_static! {
    pub static ref DEV_EUI_REGEX: Regex = Regex::new(r"^\s*[0-9A-Fa-f]{16}\s*$").unwrap();
}

fn digits_error(field: &'static str, len: usize, value: &str) -> Option<ValidationError> {
    let label = match field {
        "phone" => "Phone",
        _ => "Aadhaar",
    };
    let mut err = ValidationError::new(field);
    if value.len() != len {
        err.message = Some(format!("{label} must be {len} digits. Invalid {field} received: {value}").into());
        return Some(err);
    }
    if !value.chars().all(|ch| ch.is_ascii_digit()) {
        err.message = Some(format!("{label} must be all digits. Invalid {field} received: {value}").into());
        return Some(err);
    }
    None
}

/// Custom validator function to check phone number
pub fn validate_phonenumber(phone: &str) -> Result<(), ValidationError> {
    // phone must be 10 digits long and all numeric chars
    match digits_error("phone", PHONE_LENGTH, phone) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Custom validator function to check a 12 digit Aadhaar number
pub fn validate_aadhaar(aadhaar: &str) -> Result<(), ValidationError> {
    match digits_error("aadhaar", AADHAAR_LENGTH, aadhaar) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// JSON body which has passed its `validator` rules
pub struct ValidatedBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedBody<T>
where
    B: Send + 'static,
    S: Send + Sync,
    T: Validate + 'static,
    Json<T>: FromRequest<(), B, Rejection = axum::extract::rejection::JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = req.extract::<Json<T>, _>().await.map_err(|rejection| {
            let msg = format!("Invalid JSON body: {}", rejection.body_text());
            AppError::BadRequestErr(msg)
        })?;
        data.validate()
            .map_err(|err| AppError::BadRequestErr(err.to_string()))?;
        Ok(Self(data))
    }
}

/// Path parameters, malformed values are rejected with the JSON error body
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(data) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let msg = format!("Invalid path parameter: {}", rejection.body_text());
                AppError::BadRequestErr(msg)
            })?;
        Ok(Self(data))
    }
}

/// Query string parameters, malformed values are rejected with the JSON error body
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let msg = format!("Invalid query string: {}", rejection.body_text());
                AppError::BadRequestErr(msg)
            })?;
        Ok(Self(data))
    }
}
