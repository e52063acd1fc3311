use std::{sync::Arc, time::Duration};

use crate::{
    auth::{OtpRegistry, SessionManager},
    config::AppConfig,
};

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

/// Shared handle passed to every handler and background job
pub struct AppState {
    pub config: AppConfig,
    pub db: Arc<AppDatabase>,
    pub sessions: SessionManager,
    pub otps: OtpRegistry,
    /// client for the sms gateway
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, db: Arc<AppDatabase>) -> anyhow::Result<Arc<Self>> {
        let sessions = SessionManager::from_config(&config)?;
        if !sessions.has_admin_credentials() {
            tracing::warn!("Credential store is empty, password admin login is disabled");
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Ok(Arc::new(Self {
            config,
            db,
            sessions,
            otps: OtpRegistry::in_memory(),
            http,
        }))
    }
}
