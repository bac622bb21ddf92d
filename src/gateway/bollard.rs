// ABOUTME: Bollard-based implementation of the daemon gateway.
// ABOUTME: Connects over a local socket or TCP endpoint and normalizes responses.

use super::error::GatewayError;
use super::raw::{parse_port_key, parse_timestamp, RawContainer, RawStats};
use super::{ActionVerb, ContainerStatus, DaemonGateway, PortMapping};
use crate::config::DaemonSettings;
use crate::types::ContainerId;
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, LogsOptions, RestartContainerOptions,
    StatsOptionsBuilder, StopContainerOptions,
};
use futures::StreamExt;

const CONNECT_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_daemon_error(e: bollard::errors::Error) -> GatewayError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => match status_code {
            404 => GatewayError::NotFound(message),
            403 => GatewayError::PermissionDenied(message),
            _ => GatewayError::Daemon(message),
        },
        bollard::errors::Error::IOError { ref err }
            if err.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            GatewayError::PermissionDenied(e.to_string())
        }
        bollard::errors::Error::IOError { .. } | bollard::errors::Error::RequestTimeoutError => {
            GatewayError::Unreachable(e.to_string())
        }
        _ => GatewayError::Daemon(e.to_string()),
    }
}

fn map_status(status: bollard::models::ContainerStateStatusEnum) -> ContainerStatus {
    match status {
        bollard::models::ContainerStateStatusEnum::CREATED => ContainerStatus::Created,
        bollard::models::ContainerStateStatusEnum::RUNNING => ContainerStatus::Running,
        bollard::models::ContainerStateStatusEnum::PAUSED => ContainerStatus::Paused,
        bollard::models::ContainerStateStatusEnum::RESTARTING => ContainerStatus::Restarting,
        bollard::models::ContainerStateStatusEnum::REMOVING => ContainerStatus::Removing,
        bollard::models::ContainerStateStatusEnum::EXITED => ContainerStatus::Exited,
        bollard::models::ContainerStateStatusEnum::DEAD => ContainerStatus::Dead,
        _ => ContainerStatus::Unknown,
    }
}

// =============================================================================
// Response Mapping
// =============================================================================

fn raw_from_inspect(
    id: &ContainerId,
    details: bollard::models::ContainerInspectResponse,
) -> RawContainer {
    let status = details
        .state
        .as_ref()
        .and_then(|s| s.status)
        .map(map_status)
        .unwrap_or(ContainerStatus::Unknown);

    let started_at = details
        .state
        .as_ref()
        .and_then(|s| s.started_at.as_deref())
        .and_then(parse_timestamp);
    let finished_at = details
        .state
        .as_ref()
        .and_then(|s| s.finished_at.as_deref())
        .and_then(parse_timestamp);

    let mut ports: Vec<PortMapping> = details
        .network_settings
        .and_then(|ns| ns.ports)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, bindings)| {
            let (container_port, protocol) = parse_port_key(&key)?;
            let host_port = bindings
                .as_ref()
                .and_then(|b| b.first())
                .and_then(|b| b.host_port.as_deref())
                .and_then(|p| p.parse().ok());
            Some(PortMapping {
                container_port,
                protocol,
                host_port,
            })
        })
        .collect();
    // Daemon port maps are unordered; keep views deterministic.
    ports.sort_by_key(|p| (p.container_port, p.protocol as u8));

    RawContainer {
        id: id.clone(),
        name: details
            .name
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_string(),
        image: details
            .config
            .as_ref()
            .and_then(|c| c.image.clone())
            .unwrap_or_default(),
        status,
        created: details.created,
        started_at,
        finished_at,
        ports,
    }
}

fn raw_stats_from(stats: bollard::models::ContainerStatsResponse) -> RawStats {
    let cpu = stats.cpu_stats.as_ref();
    let precpu = stats.precpu_stats.as_ref();

    RawStats {
        cpu_total: cpu
            .and_then(|c| c.cpu_usage.as_ref())
            .and_then(|u| u.total_usage)
            .unwrap_or(0),
        precpu_total: precpu
            .and_then(|c| c.cpu_usage.as_ref())
            .and_then(|u| u.total_usage)
            .unwrap_or(0),
        system_cpu: cpu.and_then(|c| c.system_cpu_usage).unwrap_or(0),
        pre_system_cpu: precpu.and_then(|c| c.system_cpu_usage).unwrap_or(0),
        online_cpus: cpu.and_then(|c| c.online_cpus).map(|n| n as u32),
        percpu_samples: cpu
            .and_then(|c| c.cpu_usage.as_ref())
            .and_then(|u| u.percpu_usage.as_ref())
            .map(|v| v.len())
            .unwrap_or(0),
        memory_usage: stats.memory_stats.as_ref().and_then(|m| m.usage),
    }
}

// =============================================================================
// BollardGateway
// =============================================================================

/// Daemon gateway implementation over the bollard client.
///
/// Owns the single connection handle; the handle itself is safe for
/// concurrent use, so one gateway instance serves all in-flight requests.
pub struct BollardGateway {
    client: Docker,
}

impl BollardGateway {
    /// Create a gateway from an already-connected client.
    pub fn new(client: Docker) -> Self {
        Self { client }
    }

    /// Connect using the configured endpoint.
    ///
    /// No endpoint selects the platform default socket. `tcp://` and
    /// `http://` endpoints connect over TCP; anything else is treated as a
    /// unix socket path.
    pub fn connect(settings: &DaemonSettings) -> Result<Self, GatewayError> {
        let client = match settings.endpoint.as_deref() {
            None => Docker::connect_with_local_defaults(),
            Some(endpoint)
                if endpoint.starts_with("tcp://") || endpoint.starts_with("http://") =>
            {
                Docker::connect_with_http(endpoint, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            Some(path) => {
                let path = path.strip_prefix("unix://").unwrap_or(path);
                Docker::connect_with_unix(path, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl DaemonGateway for BollardGateway {
    async fn list_containers(&self) -> Result<Vec<RawContainer>, GatewayError> {
        let opts = ListContainersOptions {
            all: true,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(map_daemon_error)?;

        // The list endpoint omits start/finish timestamps, so each record is
        // completed with an inspect call. A container removed between the two
        // calls is skipped rather than failing the whole listing.
        let mut containers = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let id = ContainerId::new(summary.id.unwrap_or_default());
            match self.inspect_container(&id).await {
                Ok(raw) => containers.push(raw),
                Err(GatewayError::NotFound(_)) => {
                    tracing::debug!(container = %id, "container vanished during listing");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(containers)
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<RawContainer, GatewayError> {
        let details = self
            .client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(map_daemon_error)?;

        Ok(raw_from_inspect(id, details))
    }

    async fn container_stats(
        &self,
        id: &ContainerId,
    ) -> Result<Option<RawStats>, GatewayError> {
        let opts = StatsOptionsBuilder::new().stream(false).one_shot(true).build();

        let mut stream = self.client.stats(id.as_str(), Some(opts));
        match stream.next().await {
            Some(Ok(stats)) => Ok(Some(raw_stats_from(stats))),
            // The daemon refuses to sample non-running containers; that is
            // "no metrics available", not a failure.
            Some(Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 409,
                ..
            }))
            | None => Ok(None),
            Some(Err(e)) => Err(map_daemon_error(e)),
        }
    }

    async fn container_logs(
        &self,
        id: &ContainerId,
        tail: u64,
    ) -> Result<Vec<String>, GatewayError> {
        let opts = LogsOptions {
            stdout: true,
            stderr: true,
            follow: false,
            timestamps: false,
            tail: tail.to_string(),
            ..Default::default()
        };

        let mut stream = self.client.logs(id.as_str(), Some(opts));
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(output) => {
                    let data = match output {
                        bollard::container::LogOutput::StdOut { message } => message,
                        bollard::container::LogOutput::StdErr { message } => message,
                        bollard::container::LogOutput::StdIn { message } => message,
                        bollard::container::LogOutput::Console { message } => message,
                    };
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
                Err(e) => return Err(map_daemon_error(e)),
            }
        }

        Ok(buffer.lines().map(str::to_string).collect())
    }

    async fn perform_action(
        &self,
        id: &ContainerId,
        verb: ActionVerb,
    ) -> Result<(), GatewayError> {
        tracing::debug!(container = %id, %verb, "issuing lifecycle action");

        let result = match verb {
            ActionVerb::Start => {
                self.client
                    .start_container(
                        id.as_str(),
                        None::<bollard::query_parameters::StartContainerOptions>,
                    )
                    .await
            }
            ActionVerb::Stop => {
                let opts = StopContainerOptions {
                    t: None,
                    signal: None,
                };
                self.client.stop_container(id.as_str(), Some(opts)).await
            }
            ActionVerb::Restart => {
                self.client
                    .restart_container(id.as_str(), None::<RestartContainerOptions>)
                    .await
            }
        };

        match result {
            Ok(()) => Ok(()),
            // 304: start of a running container or stop of a stopped one.
            // The daemon is already in the requested state.
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 304, ..
            }) => Ok(()),
            Err(e) => Err(map_daemon_error(e)),
        }
    }
}
