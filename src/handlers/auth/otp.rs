use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    phone: &'a str,
    message: String,
}

/// Send the otp to `phone` through the SMS gateway when one is configured
pub async fn deliver_otp(state: &AppState, phone: &str, otp: &str) -> anyhow::Result<()> {
    tracing::debug!("Sending otp to phone {}", masked_phone(phone));
    let Some(url) = state.config.sms_gateway_url.as_deref() else {
        return Ok(());
    };
    let minutes = state.otps.validity() / 60;
    let payload = SmsPayload {
        phone,
        message: format!("Your Smart Panchayat login OTP is {otp}. It is valid for {minutes} minutes."),
    };
    state
        .http
        .post(url)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Only the last 4 digits of the phone number
fn masked_phone(phone: &str) -> String {
    let visible = phone.len().saturating_sub(4);
    let tail = phone.get(visible..).unwrap_or_default();
    format!("{}{tail}", "*".repeat(visible))
}
