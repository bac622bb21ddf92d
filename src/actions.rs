// ABOUTME: Lifecycle action orchestration with settle-and-reconcile.
// ABOUTME: Issues a verb, waits a bounded settle interval, then re-reads state.

use crate::config::ActionSettings;
use crate::gateway::{ActionVerb, DaemonGateway, GatewayError};
use crate::snapshot::{ContainerView, SnapshotBuilder};
use crate::types::ContainerId;
use std::time::Duration;

/// Executes one lifecycle action and returns the post-action state.
///
/// Callers always get a fresh view (or `NotFound`), never a bare
/// acknowledgement: daemon state transitions are not instantaneous, so an
/// immediate re-read after the action would race. The settle interval is a
/// single bounded wait, not a poll loop, and suspends only the requesting
/// task; concurrent polls and log views proceed unaffected.
pub struct ActionOrchestrator {
    settle: Duration,
}

impl ActionOrchestrator {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    pub fn from_settings(settings: &ActionSettings) -> Self {
        Self::new(settings.settle_delay)
    }

    /// Issue `verb` against one container, settle, and reconcile.
    ///
    /// Action failures propagate immediately with no settle or re-read, and
    /// no verb is ever retried. A container removed while settling (stop
    /// combined with auto-remove) reports `NotFound` rather than a stale
    /// view. Two concurrent actions against the same container are not
    /// serialized here; the last settle-and-refresh reports whatever state
    /// the daemon converged to.
    pub async fn execute<G>(
        &self,
        gateway: &G,
        snapshots: &SnapshotBuilder,
        id: &ContainerId,
        verb: ActionVerb,
    ) -> Result<ContainerView, GatewayError>
    where
        G: DaemonGateway + ?Sized,
    {
        gateway.perform_action(id, verb).await?;

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let view = snapshots.build_one(gateway, id).await?;
        tracing::debug!(container = %id, %verb, status = %view.status, "action settled");
        Ok(view)
    }
}
