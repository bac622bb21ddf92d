// ABOUTME: Environment variable parsing helpers for settings overrides.
// ABOUTME: Invalid values fall back to whatever was already configured.

use crate::exec::ExecProfile;
use std::time::Duration;

/// Non-empty string value of `name`, if set.
pub(crate) fn string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Positive integer value of `name`. Zero, negative, and unparseable values
/// are ignored with a debug line.
pub(crate) fn positive_u64(name: &str) -> Option<u64> {
    let raw = string(name)?;
    match raw.parse::<u64>() {
        Ok(value) if value >= 1 => Some(value),
        _ => {
            tracing::debug!(var = name, value = %raw, "ignoring invalid integer override");
            None
        }
    }
}

/// Non-negative duration in (possibly fractional) seconds.
pub(crate) fn seconds_f64(name: &str) -> Option<Duration> {
    let raw = string(name)?;
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            tracing::debug!(var = name, value = %raw, "ignoring invalid duration override");
            None
        }
    }
}

/// Comma-separated exec profile list. `"all"` maps to `Some(None)` (all
/// profiles enabled); an unset variable maps to `None` (no override).
/// Unknown entries are skipped; a list with no valid entries is ignored.
pub(crate) fn exec_profiles(name: &str) -> Option<Option<Vec<ExecProfile>>> {
    let raw = string(name)?;
    if raw.trim().eq_ignore_ascii_case("all") {
        return Some(None);
    }

    let profiles: Vec<ExecProfile> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(profile) => Some(profile),
            Err(_) => {
                tracing::debug!(var = name, entry = s, "ignoring unknown exec profile");
                None
            }
        })
        .collect();

    if profiles.is_empty() {
        None
    } else {
        Some(Some(profiles))
    }
}
