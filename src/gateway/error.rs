// ABOUTME: Error taxonomy for daemon gateway operations.
// ABOUTME: Every daemon failure is reported upward verbatim as one of these.

use thiserror::Error;

/// Errors from daemon operations.
///
/// No call retries on failure; each error surfaces exactly once to the
/// caller, which decides whether the next poll retries.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The daemon does not know the container id or name.
    #[error("container not found: {0}")]
    NotFound(String),

    /// The daemon socket or API refused access.
    #[error("permission denied by daemon: {0} (check socket permissions or group membership)")]
    PermissionDenied(String),

    /// Transport-level failure reaching the daemon, including timeouts.
    #[error("daemon unreachable: {0}")]
    Unreachable(String),

    /// The daemon returned an unexpected error for a well-formed request.
    #[error("daemon error: {0}")]
    Daemon(String),
}
