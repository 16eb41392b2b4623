//! Periodic expired-session sweep.
//!
//! Lazy deletion during validation is what keeps sessions correct; this
//! sweep only reclaims storage from expired rows that nobody ever looked
//! up again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use quillhub_core::error::AppError;
use quillhub_core::result::AppResult;
use quillhub_core::traits::SessionStore;

/// Deletes expired session rows on a fixed interval.
#[derive(Clone)]
pub struct SessionSweeper {
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSweeper").finish()
    }
}

impl SessionSweeper {
    /// Creates a new sweeper.
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Runs a single sweep cycle. Returns the number of rows removed.
    pub async fn run_once(&self) -> AppResult<u64> {
        let removed = self.sessions.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Expired sessions swept");
        }
        Ok(removed)
    }

    /// Starts the scheduled sweep and returns the running scheduler.
    /// The scheduler stops when the returned handle is dropped or shut
    /// down by the caller.
    pub async fn start(&self, interval_minutes: u64) -> Result<JobScheduler, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create sweep scheduler: {e}")))?;

        let sessions = Arc::clone(&self.sessions);
        let job = Job::new_repeated_async(
            Duration::from_secs(interval_minutes * 60),
            move |_uuid, _lock| {
                let sessions = Arc::clone(&sessions);
                Box::pin(async move {
                    match sessions.delete_expired(Utc::now()).await {
                        Ok(removed) if removed > 0 => {
                            info!(removed, "Expired sessions swept");
                        }
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Session sweep failed"),
                    }
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create sweep job: {e}")))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to schedule sweep job: {e}")))?;

        scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start sweep scheduler: {e}")))?;

        info!(interval_minutes, "Session sweep scheduled");
        Ok(scheduler)
    }
}
