// ABOUTME: Bounded log tailing for containers.
// ABOUTME: Clamps requested line counts to configured default/max before hitting the daemon.

use crate::config::LogSettings;
use crate::gateway::{DaemonGateway, GatewayError};
use crate::types::ContainerId;

/// Fetches a bounded slice of a container's log stream.
///
/// The resolved line count is the only value ever passed to the gateway, so
/// no caller input can force retrieval beyond the configured maximum.
pub struct LogTailService {
    default_tail: u64,
    max_tail: u64,
}

impl LogTailService {
    pub fn new(default_tail: u64, max_tail: u64) -> Self {
        let max_tail = max_tail.max(1);
        Self {
            default_tail: default_tail.clamp(1, max_tail),
            max_tail,
        }
    }

    pub fn from_settings(settings: &LogSettings) -> Self {
        Self::new(settings.default_tail, settings.max_tail)
    }

    /// Resolve a requested line count: absent, zero, or negative values fall
    /// back to the default; values beyond the maximum are clamped, never
    /// rejected.
    pub fn resolve(&self, requested: Option<i64>) -> u64 {
        match requested {
            Some(n) if n > 0 => (n as u64).min(self.max_tail),
            _ => self.default_tail,
        }
    }

    /// The last lines of the container's logs, oldest first.
    pub async fn tail<G>(
        &self,
        gateway: &G,
        id: &ContainerId,
        requested: Option<i64>,
    ) -> Result<Vec<String>, GatewayError>
    where
        G: DaemonGateway + ?Sized,
    {
        gateway.container_logs(id, self.resolve(requested)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service() -> LogTailService {
        LogTailService::new(200, 5000)
    }

    #[test]
    fn absent_zero_and_negative_resolve_to_default() {
        let s = service();
        assert_eq!(s.resolve(None), 200);
        assert_eq!(s.resolve(Some(0)), 200);
        assert_eq!(s.resolve(Some(-50)), 200);
    }

    #[test]
    fn oversized_requests_clamp_to_max() {
        let s = service();
        assert_eq!(s.resolve(Some(5001)), 5000);
        assert_eq!(s.resolve(Some(i64::MAX)), 5000);
    }

    #[test]
    fn in_range_requests_pass_through() {
        let s = service();
        assert_eq!(s.resolve(Some(1)), 1);
        assert_eq!(s.resolve(Some(500)), 500);
        assert_eq!(s.resolve(Some(5000)), 5000);
    }

    #[test]
    fn default_is_capped_at_max_on_construction() {
        let s = LogTailService::new(10_000, 500);
        assert_eq!(s.resolve(None), 500);
    }

    #[test]
    fn degenerate_limits_still_leave_at_least_one_line() {
        let s = LogTailService::new(0, 0);
        assert_eq!(s.resolve(None), 1);
        assert_eq!(s.resolve(Some(100)), 1);
    }

    proptest! {
        #[test]
        fn resolution_is_always_within_bounds(requested in any::<Option<i64>>()) {
            let s = service();
            let resolved = s.resolve(requested);
            prop_assert!(resolved >= 1);
            prop_assert!(resolved <= 5000);
        }

        #[test]
        fn valid_requests_are_never_altered(requested in 1i64..=5000) {
            let s = service();
            prop_assert_eq!(s.resolve(Some(requested)), requested as u64);
        }
    }
}
