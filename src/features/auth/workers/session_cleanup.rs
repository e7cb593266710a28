use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::auth::services::AuthService;

/// Background worker that purges expired sessions
pub struct SessionCleanupWorker {
    auth_service: Arc<AuthService>,
    every: Duration,
}

impl SessionCleanupWorker {
    pub fn new(auth_service: Arc<AuthService>, every: Duration) -> Self {
        Self {
            auth_service,
            every,
        }
    }

    /// Run the cleanup in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting session cleanup worker (every {}s)",
            self.every.as_secs()
        );

        // tokio panics on a zero period
        let mut interval = interval(self.every.max(Duration::from_secs(1)));

        loop {
            interval.tick().await;

            match self.auth_service.delete_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired sessions", removed),
                Err(e) => tracing::error!("Session cleanup failed: {:?}", e),
            }
        }
    }
}
