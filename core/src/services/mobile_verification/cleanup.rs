//! Periodic cleanup of abandoned cross-phase decisions
//!
//! A pre-phase that records a skip reason but never sees its post-phase
//! (single-claim updates, aborted persistence) leaves an entry behind in
//! the coordinator. This service reclaims entries older than a configured
//! age.

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::coordinator::CrossPhaseCoordinator;

/// Configuration for coordinator cleanup
#[derive(Debug, Clone)]
pub struct CoordinatorCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Age after which a recorded decision is considered abandoned (in seconds)
    pub max_age_seconds: i64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CoordinatorCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300, // Run every 5 minutes
            max_age_seconds: 1800, // Abandon after 30 minutes
            enabled: true,
        }
    }
}

/// Service reclaiming coordinator entries whose post-phase never arrived
pub struct CoordinatorCleanupService {
    coordinator: Arc<CrossPhaseCoordinator>,
    config: CoordinatorCleanupConfig,
}

impl CoordinatorCleanupService {
    pub fn new(coordinator: Arc<CrossPhaseCoordinator>, config: CoordinatorCleanupConfig) -> Self {
        Self { coordinator, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// Number of abandoned entries removed
    pub fn run_cleanup(&self) -> usize {
        if !self.config.enabled {
            return 0;
        }

        let purged = self
            .coordinator
            .purge_stale(Duration::seconds(self.config.max_age_seconds));
        debug!(
            purged = purged,
            remaining = self.coordinator.pending_operations(),
            "Coordinator cleanup cycle completed"
        );
        purged
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that runs cleanup at regular intervals. Must be
    /// called from within a tokio runtime.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Coordinator cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                max_age_seconds = self.config.max_age_seconds,
                "Coordinator cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;
                self.run_cleanup();
            }
        });
    }
}
