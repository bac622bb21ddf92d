// ABOUTME: Daemon gateway trait and its production bollard implementation.
// ABOUTME: The sole seam through which the rest of the crate talks to the daemon.

mod bollard;
mod error;
mod raw;

pub use self::bollard::BollardGateway;
pub use error::GatewayError;
pub use raw::{ContainerStatus, PortMapping, Protocol, RawContainer, RawStats};

use crate::types::ContainerId;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle action a caller may issue against one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerb {
    Start,
    Stop,
    Restart,
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionVerb::Start => write!(f, "start"),
            ActionVerb::Stop => write!(f, "stop"),
            ActionVerb::Restart => write!(f, "restart"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid action: {0}")]
pub struct ParseActionError(String);

impl FromStr for ActionVerb {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ActionVerb::Start),
            "stop" => Ok(ActionVerb::Stop),
            "restart" => Ok(ActionVerb::Restart),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// Operations against the container daemon.
///
/// Every method is one remote round-trip; failures propagate verbatim as
/// [`GatewayError`] with no retries at this layer. The production
/// implementation is [`BollardGateway`]; tests substitute their own.
#[async_trait]
pub trait DaemonGateway: Send + Sync {
    /// All containers known to the daemon (running or not), in daemon order,
    /// with timestamps and port bindings populated.
    async fn list_containers(&self) -> Result<Vec<RawContainer>, GatewayError>;

    /// One container's current record.
    async fn inspect_container(&self, id: &ContainerId) -> Result<RawContainer, GatewayError>;

    /// One-shot resource sample. `Ok(None)` is the legitimate outcome for a
    /// container the daemon cannot sample (not running), not an error.
    async fn container_stats(&self, id: &ContainerId)
    -> Result<Option<RawStats>, GatewayError>;

    /// The last `tail` log lines, oldest first.
    async fn container_logs(
        &self,
        id: &ContainerId,
        tail: u64,
    ) -> Result<Vec<String>, GatewayError>;

    /// Issue a lifecycle action. Completion of this call does not imply the
    /// daemon has finished converging; see the action orchestrator.
    async fn perform_action(
        &self,
        id: &ContainerId,
        verb: ActionVerb,
    ) -> Result<(), GatewayError>;
}
