use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{SecondsFormat, TimeZone, Utc};
use rand::{thread_rng, Rng, RngCore};
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::constants::*;

/// Get EPOCH timestamp in seconds
pub fn get_epoch_ts() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Generate a 6 digit OTP drawn uniformly from 100000..=999999
pub fn generate_otp() -> String {
    let mut rng = thread_rng();
    rng.gen_range(OTP_MIN_VALUE..=OTP_MAX_VALUE).to_string()
}

/// URL safe random string built from `len` bytes of the thread local CSPRNG
pub fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two secrets without leaking the position of the first mismatch
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// RFC 3339 rendering of an EPOCH timestamp in seconds
pub fn format_epoch_ts(ts: u64) -> Option<String> {
    let ts = i64::try_from(ts).ok()?;
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// devEUIs are stored upper case
pub fn normalize_dev_eui(dev_eui: &str) -> String {
    dev_eui.trim().to_ascii_uppercase()
}
