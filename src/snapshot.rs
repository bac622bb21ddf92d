// ABOUTME: Builds normalized container view models from raw daemon records.
// ABOUTME: Derives status, uptime, resource usage, and external links per container.

use crate::gateway::{
    ContainerStatus, DaemonGateway, GatewayError, PortMapping, RawContainer, RawStats,
};
use crate::types::ContainerId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Read-only projection of one container for the presentation layer.
///
/// Constructed fresh on every snapshot request and never mutated or cached;
/// two polls yield two independent views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    pub created: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Time running (for live containers) or total runtime (for finished
    /// ones). Absent when the daemon's timestamps don't allow it.
    #[serde(with = "humantime_serde")]
    pub uptime: Option<Duration>,
    /// Absent when the daemon returned no stats for this container.
    pub stats: Option<ResourceUsage>,
    pub ports: Vec<PortMapping>,
    /// One URL per published port, `{scheme}://{host}:{host_port}`.
    pub links: Vec<String>,
}

impl ContainerView {
    /// Human-readable uptime, e.g. `"3d 2h"`, for direct display.
    pub fn uptime_human(&self) -> Option<String> {
        self.uptime.map(format_uptime)
    }
}

/// CPU/memory sample derived from one raw stats read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceUsage {
    /// Percent of one CPU, one decimal. None when the counters don't allow
    /// the delta computation (e.g. first sample after start).
    pub cpu_percent: Option<f64>,
    /// Whole megabytes.
    pub memory_mb: Option<f64>,
}

/// Renders `Duration`s the way the dashboard shows them.
pub fn format_uptime(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 86_400 {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3_600)
    } else if secs >= 3_600 {
        format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

fn cpu_percent(stats: &RawStats) -> Option<f64> {
    let cpu_delta = stats.cpu_total.checked_sub(stats.precpu_total)?;
    let system_delta = stats.system_cpu.checked_sub(stats.pre_system_cpu)?;
    if cpu_delta == 0 || system_delta == 0 {
        return None;
    }
    let cpus = stats
        .online_cpus
        .map(|n| n as usize)
        .unwrap_or_else(|| stats.percpu_samples.max(1));
    Some((cpu_delta as f64 / system_delta as f64) * cpus as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn compute_uptime(raw: &RawContainer, now: DateTime<Utc>) -> Option<Duration> {
    match raw.status {
        ContainerStatus::Running | ContainerStatus::Paused | ContainerStatus::Restarting => {
            raw.started_at.and_then(|s| (now - s).to_std().ok())
        }
        ContainerStatus::Exited | ContainerStatus::Dead => {
            match (raw.started_at, raw.finished_at) {
                (Some(started), Some(finished)) => (finished - started).to_std().ok(),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Turns raw daemon records into [`ContainerView`]s.
///
/// Holds only the configured link scheme/host; the gateway is passed in by
/// callers, so the builder itself stays a stateless transformer.
pub struct SnapshotBuilder {
    link_scheme: String,
    link_host: String,
}

impl SnapshotBuilder {
    pub fn new(link_scheme: impl Into<String>, link_host: impl Into<String>) -> Self {
        Self {
            link_scheme: link_scheme.into(),
            link_host: link_host.into(),
        }
    }

    /// Pure derivation of one view. Deterministic for a given `now`.
    pub fn build(
        &self,
        raw: &RawContainer,
        stats: Option<&RawStats>,
        now: DateTime<Utc>,
    ) -> ContainerView {
        let links = raw
            .ports
            .iter()
            .filter_map(|p| {
                p.host_port
                    .map(|hp| format!("{}://{}:{}", self.link_scheme, self.link_host, hp))
            })
            .collect();

        let stats = stats.map(|s| ResourceUsage {
            cpu_percent: cpu_percent(s).map(round1),
            memory_mb: s
                .memory_usage
                .map(|bytes| (bytes as f64 / (1024.0 * 1024.0)).round()),
        });

        ContainerView {
            id: raw.id.clone(),
            name: raw.name.clone(),
            image: raw.image.clone(),
            status: raw.status,
            created: raw.created,
            started_at: raw.started_at,
            finished_at: raw.finished_at,
            uptime: compute_uptime(raw, now),
            stats,
            ports: raw.ports.clone(),
            links,
        }
    }

    /// One container, freshly inspected and sampled.
    pub async fn build_one<G>(
        &self,
        gateway: &G,
        id: &ContainerId,
    ) -> Result<ContainerView, GatewayError>
    where
        G: DaemonGateway + ?Sized,
    {
        let raw = gateway.inspect_container(id).await?;
        let stats = self.stats_for(gateway, &raw).await;
        Ok(self.build(&raw, stats.as_ref(), Utc::now()))
    }

    /// The full dashboard listing.
    ///
    /// Each container is processed independently: a failing stats read leaves
    /// that one view without stats, it never fails the batch.
    pub async fn build_all<G>(&self, gateway: &G) -> Result<Vec<ContainerView>, GatewayError>
    where
        G: DaemonGateway + ?Sized,
    {
        let containers = gateway.list_containers().await?;
        let now = Utc::now();

        let mut views = Vec::with_capacity(containers.len());
        for raw in &containers {
            let stats = self.stats_for(gateway, raw).await;
            views.push(self.build(raw, stats.as_ref(), now));
        }

        Ok(views)
    }

    /// Stats for one container, absorbed to `None` on any failure. Containers
    /// that are not running are never sampled.
    async fn stats_for<G>(&self, gateway: &G, raw: &RawContainer) -> Option<RawStats>
    where
        G: DaemonGateway + ?Sized,
    {
        if !raw.status.is_running() {
            return None;
        }
        match gateway.container_stats(&raw.id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::debug!(container = %raw.id, error = %e, "stats unavailable");
                None
            }
        }
    }
}
