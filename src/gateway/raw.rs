// ABOUTME: Strict boundary types produced by the daemon gateway.
// ABOUTME: Loosely-typed daemon payloads are mapped into these as early as possible.

use crate::types::ContainerId;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a container, as a closed set.
///
/// Raw states the daemon may grow in the future map to `Unknown` rather than
/// failing the snapshot that carried them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerStatus {
    pub fn is_running(self) -> bool {
        matches!(self, ContainerStatus::Running)
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Paused => "paused",
            ContainerStatus::Restarting => "restarting",
            ContainerStatus::Removing => "removing",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Dead => "dead",
            ContainerStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Network protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// One port exposed by a container, published to the host or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    pub container_port: u16,
    pub protocol: Protocol,
    /// None when the port is exposed but not published on the host.
    pub host_port: Option<u16>,
}

/// A container record as reported by the daemon, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawContainer {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    pub created: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub ports: Vec<PortMapping>,
}

/// One resource-usage sample for a container.
///
/// Counters are carried raw; percentage math happens in the snapshot layer.
/// Missing counters come through as zero, which the delta computation treats
/// as "no sample".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawStats {
    pub cpu_total: u64,
    pub precpu_total: u64,
    pub system_cpu: u64,
    pub pre_system_cpu: u64,
    pub online_cpus: Option<u32>,
    /// Number of per-CPU samples, the fallback when `online_cpus` is absent.
    pub percpu_samples: usize,
    pub memory_usage: Option<u64>,
}

/// Parse a daemon port key such as `"80/tcp"` into its components.
///
/// Keys with protocols outside the closed set (e.g. sctp) yield `None` and
/// the mapping is skipped.
pub(crate) fn parse_port_key(key: &str) -> Option<(u16, Protocol)> {
    let (port, proto) = key.split_once('/')?;
    let port = port.parse().ok()?;
    let protocol = match proto {
        "tcp" => Protocol::Tcp,
        "udp" => Protocol::Udp,
        _ => return None,
    };
    Some((port, protocol))
}

/// Parse a daemon timestamp, treating the `0001-01-01T00:00:00Z` sentinel
/// (never started / never finished) and malformed values as absent.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value).ok()?;
    let parsed = parsed.with_timezone(&Utc);
    if parsed.year() <= 1 {
        return None;
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_key_parses_tcp_and_udp() {
        assert_eq!(parse_port_key("80/tcp"), Some((80, Protocol::Tcp)));
        assert_eq!(parse_port_key("53/udp"), Some((53, Protocol::Udp)));
    }

    #[test]
    fn port_key_rejects_unknown_protocols_and_garbage() {
        assert_eq!(parse_port_key("9000/sctp"), None);
        assert_eq!(parse_port_key("80"), None);
        assert_eq!(parse_port_key("not-a-port/tcp"), None);
        assert_eq!(parse_port_key(""), None);
    }

    #[test]
    fn timestamp_parses_rfc3339() {
        let ts = parse_timestamp("2024-05-01T12:30:00.000000000Z").unwrap();
        assert_eq!(ts.year(), 2024);
    }

    #[test]
    fn timestamp_treats_sentinel_as_absent() {
        assert_eq!(parse_timestamp("0001-01-01T00:00:00Z"), None);
    }

    #[test]
    fn timestamp_treats_malformed_as_absent() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
