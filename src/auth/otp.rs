use std::sync::Arc;
use thiserror::Error;

use crate::{
    constants::*,
    store::{EphemeralStore, Expiring, MemoryStore},
    utils::{constant_time_eq, generate_otp, get_epoch_ts},
};

/// Outstanding one time password for a phone
#[derive(Debug, Clone, PartialEq)]
pub struct OtpRecord {
    pub phone: String,
    pub code: String,
    pub expires_at: u64,
    pub attempt_count: u32,
    /// villager id the otp was issued for
    pub identity: u32,
}

impl Expiring for OtpRecord {
    fn expires_at(&self) -> u64 {
        self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("No active OTP for this phone. Please request a new OTP")]
    NotFound,
    #[error("OTP expired. Please request a new OTP")]
    Expired,
    #[error("Too many failed attempts. Please request a new OTP")]
    TooManyAttempts,
    #[error("Invalid OTP. {remaining} attempt(s) remaining")]
    Mismatch { remaining: u32 },
}

impl OtpError {
    /// Stable machine readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "OTP_NOT_FOUND",
            Self::Expired => "OTP_EXPIRED",
            Self::TooManyAttempts => "OTP_LOCKED",
            Self::Mismatch { .. } => "OTP_MISMATCH",
        }
    }
}

/// Phone number keyed registry of single use codes
pub struct OtpRegistry {
    store: Arc<dyn EphemeralStore<OtpRecord>>,
    validity: u64,
    max_attempts: u32,
}

impl OtpRegistry {
    pub fn new(store: Arc<dyn EphemeralStore<OtpRecord>>) -> Self {
        Self {
            store,
            validity: OTP_VALIDITY_SECS,
            max_attempts: OTP_MAX_ATTEMPTS,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Issue a fresh otp for `phone`, replacing any outstanding one
    pub fn issue(&self, phone: &str, identity: u32) -> String {
        self.issue_at(phone, identity, get_epoch_ts())
    }

    pub fn issue_at(&self, phone: &str, identity: u32, now: u64) -> String {
        let code = generate_otp();
        let record = OtpRecord {
            phone: phone.to_owned(),
            code: code.clone(),
            expires_at: now + self.validity,
            attempt_count: 0,
            identity,
        };
        self.store.set(phone, record);
        code
    }

    /// Check `code` against the outstanding otp of `phone`.
    /// On success the record is consumed and the associated identity returned.
    pub fn verify(&self, phone: &str, code: &str) -> Result<u32, OtpError> {
        self.verify_at(phone, code, get_epoch_ts())
    }

    pub fn verify_at(&self, phone: &str, code: &str, now: u64) -> Result<u32, OtpError> {
        let max_attempts = self.max_attempts;
        let mut outcome = Err(OtpError::NotFound);
        self.store.update(phone, &mut |record| {
            if now > record.expires_at {
                outcome = Err(OtpError::Expired);
                return false;
            }
            if record.attempt_count >= max_attempts {
                outcome = Err(OtpError::TooManyAttempts);
                return false;
            }
            record.attempt_count += 1;
            if constant_time_eq(&record.code, code) {
                outcome = Ok(record.identity);
                return false;
            }
            let remaining = max_attempts - record.attempt_count;
            outcome = Err(OtpError::Mismatch { remaining });
            true
        });
        outcome
    }

    /// Outstanding record for `phone`, if any
    pub fn peek(&self, phone: &str) -> Option<OtpRecord> {
        self.store.get(phone)
    }

    pub fn sweep_expired(&self, now: u64) -> usize {
        self.store.sweep_expired(now)
    }

    pub fn validity(&self) -> u64 {
        self.validity
    }
}
