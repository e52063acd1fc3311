use std::{sync::Arc, time::Duration};
use tokio::time::interval;

use crate::{state::AppState, utils::get_epoch_ts};

/// Periodically removes expired otp records, opaque sessions and revoked token ids
pub async fn cleanup_job(state: Arc<AppState>) {
    tracing::debug!("initializing cleanup scheduler job");
    let mut interval = interval(Duration::from_secs(state.config.sweep_interval.max(1)));
    loop {
        interval.tick().await;
        sweep(&state, get_epoch_ts());
    }
}

/// One sweep over the in memory stores, returns the number of removed entries
pub fn sweep(state: &AppState, now: u64) -> usize {
    let otps = state.otps.sweep_expired(now);
    let sessions = state.sessions.sweep_expired(now);
    if otps + sessions > 0 {
        tracing::debug!("Swept {otps} expired otp(s) and {sessions} expired session(s)");
    }
    otps + sessions
}
