//! Progress tracking and cluster readiness polling
//!
//! Cluster creation is asynchronous on the API side: the create call returns
//! as soon as the request is accepted and the cluster then moves through
//! provisioning states until it reports `IDLE`. [`ClusterPoller`] drives that
//! wait as a small state machine that advances one step per call, and
//! [`wait_for_cluster`] runs it to completion with optional progress
//! callbacks for UI updates.

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::client::AtlasClient;
use crate::error::{CoreError, Result};
use crate::models::{Cluster, ClusterState, ClusterTier};

/// Seconds between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const FREE_TIER_MAX_ATTEMPTS: u32 = 30;
/// Dedicated clusters take longer to provision
pub const PAID_TIER_MAX_ATTEMPTS: u32 = 60;

/// Polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    pub fn free_tier() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: FREE_TIER_MAX_ATTEMPTS,
        }
    }

    pub fn paid_tier() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: PAID_TIER_MAX_ATTEMPTS,
        }
    }

    pub fn for_tier(tier: ClusterTier) -> Self {
        match tier {
            ClusterTier::Free => Self::free_tier(),
            ClusterTier::Paid => Self::paid_tier(),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Progress events emitted during provisioning
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Create request accepted by the API
    Submitted { cluster: String },
    /// One status check finished without the cluster being ready
    Polling {
        cluster: String,
        state: ClusterState,
        attempt: u32,
        max_attempts: u32,
        elapsed: Duration,
    },
    /// Cluster reported IDLE
    Ready { cluster: String, attempts: u32 },
    /// Administrative database user created
    UserCreated { username: String },
    /// Administrative database user was already present
    UserExists { username: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to drive its spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

/// Outcome of a single poller step
#[derive(Debug, Clone)]
pub enum PollStep {
    /// The cluster exists but is not ready yet
    Pending(ClusterState),
    /// The cluster reported the ready sentinel
    Ready(Cluster),
}

/// Readiness poller for one cluster
///
/// Each [`step`](ClusterPoller::step) waits one interval and performs one
/// status query. A failed query is fatal and never retried. Once
/// `max_attempts` queries have come back not ready, the next step fails
/// with [`CoreError::ClusterTimeout`] without touching the network.
#[derive(Debug)]
pub struct ClusterPoller<'a> {
    client: &'a AtlasClient,
    project_id: String,
    cluster_name: String,
    settings: PollSettings,
    attempts: u32,
    started: Instant,
}

impl<'a> ClusterPoller<'a> {
    pub fn new(
        client: &'a AtlasClient,
        project_id: impl Into<String>,
        cluster_name: impl Into<String>,
        settings: PollSettings,
    ) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            cluster_name: cluster_name.into(),
            settings,
            attempts: 0,
            started: Instant::now(),
        }
    }

    /// Status queries performed so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.settings.max_attempts
    }

    /// Advance by one interval and one status query
    pub async fn step(&mut self) -> Result<PollStep> {
        if self.is_exhausted() {
            return Err(CoreError::ClusterTimeout {
                cluster: self.cluster_name.clone(),
                attempts: self.attempts,
            });
        }

        tokio::time::sleep(self.settings.interval).await;
        self.attempts += 1;

        let cluster = get_cluster(self.client, &self.project_id, &self.cluster_name).await?;
        let state = cluster.state();
        if state.is_ready() {
            return Ok(PollStep::Ready(cluster));
        }

        info!(
            "Waiting for cluster to be ready. Current status: {}, Attempt: {}/{}",
            state, self.attempts, self.settings.max_attempts
        );
        Ok(PollStep::Pending(state))
    }
}

/// Fetch a cluster; anything but 200 is a remote rejection
pub async fn get_cluster(
    client: &AtlasClient,
    project_id: &str,
    cluster_name: &str,
) -> Result<Cluster> {
    let context = "checking cluster status";
    let response = client
        .get(
            &format!("/groups/{}/clusters/{}", project_id, cluster_name),
            context,
        )
        .await?;

    if response.status.as_u16() != 200 {
        return Err(response.into_error("Failed to check cluster status"));
    }
    response.json(context)
}

/// Poll until the cluster is ready, the budget runs out, or a status query
/// fails
///
/// # Example
///
/// ```rust,ignore
/// use atlasctl_core::progress::{wait_for_cluster, PollSettings, ProgressEvent};
///
/// let cluster = wait_for_cluster(
///     &client,
///     "5f1a...",
///     "sandbox",
///     PollSettings::free_tier(),
///     &Some(Box::new(|event| {
///         if let ProgressEvent::Polling { state, attempt, max_attempts, .. } = event {
///             println!("{} ({}/{})", state, attempt, max_attempts);
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn wait_for_cluster(
    client: &AtlasClient,
    project_id: &str,
    cluster_name: &str,
    settings: PollSettings,
    on_progress: &Option<ProgressCallback>,
) -> Result<Cluster> {
    let mut poller = ClusterPoller::new(client, project_id, cluster_name, settings);

    loop {
        match poller.step().await {
            Ok(PollStep::Ready(cluster)) => {
                emit(
                    on_progress,
                    ProgressEvent::Ready {
                        cluster: cluster_name.to_string(),
                        attempts: poller.attempts(),
                    },
                );
                return Ok(cluster);
            }
            Ok(PollStep::Pending(state)) => emit(
                on_progress,
                ProgressEvent::Polling {
                    cluster: cluster_name.to_string(),
                    state,
                    attempt: poller.attempts(),
                    max_attempts: settings.max_attempts,
                    elapsed: poller.elapsed(),
                },
            ),
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_budgets() {
        assert_eq!(PollSettings::free_tier().max_attempts, 30);
        assert_eq!(PollSettings::paid_tier().max_attempts, 60);
        assert_eq!(PollSettings::free_tier().interval, Duration::from_secs(30));
        assert_eq!(PollSettings::for_tier(ClusterTier::Paid), PollSettings::paid_tier());
    }

    #[test]
    fn test_settings_builders() {
        let settings = PollSettings::free_tier()
            .with_interval(Duration::from_millis(5))
            .with_max_attempts(2);
        assert_eq!(settings.interval, Duration::from_millis(5));
        assert_eq!(settings.max_attempts, 2);
    }

    #[tokio::test]
    async fn test_exhausted_poller_times_out_without_request() {
        use crate::config::ApiCredentials;

        // Unroutable base URL: any request attempt would fail as a transport error
        let client =
            AtlasClient::new(ApiCredentials::new("k", "s"), "http://127.0.0.1:9", "v").unwrap();
        let mut poller = ClusterPoller::new(
            &client,
            "p1",
            "demo",
            PollSettings::free_tier().with_max_attempts(0),
        );

        let err = poller.step().await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(poller.attempts(), 0);
    }
}
