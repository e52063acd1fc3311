use std::sync::Arc;

use self::cleanup::cleanup_job;
use crate::state::AppState;

pub mod cleanup;

pub fn spawn_all_jobs(state: Arc<AppState>) {
    // spawn job to sweep expired otps & sessions
    tokio::spawn(async move {
        cleanup_job(state).await;
    });
}
