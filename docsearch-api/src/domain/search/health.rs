//! Liveness probe for the index backend.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use super::traits::IndexBackend;
use super::types::SourceHealth;

/// Checks whether the index backend is serving. Never fails; problems are reported in
/// the returned [`SourceHealth`].
#[derive(Clone)]
pub struct HealthProber {
    backend: Arc<dyn IndexBackend>,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(backend: Arc<dyn IndexBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub async fn probe(&self) -> SourceHealth {
        match tokio::time::timeout(self.timeout, self.backend.health()).await {
            Ok(Ok(health)) => {
                let is_running = health.status.is_serving();
                debug!(status = health.status.as_str(), is_running, "Index health probed");
                SourceHealth {
                    is_running,
                    status: health.status.as_str().to_string(),
                    error: (!is_running)
                        .then(|| "cluster reported red status".to_string()),
                    number_of_nodes: health.number_of_nodes,
                    active_shards: health.active_shards,
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Index health check failed");
                SourceHealth::unreachable(e.to_string())
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Index health check timed out");
                SourceHealth::unreachable(format!(
                    "health check timed out after {}ms",
                    self.timeout.as_millis()
                ))
            }
        }
    }
}
