// ABOUTME: Per-platform shell-exec command composition.
// ABOUTME: Pure templates over container name, WSL distro, and shell; no daemon access.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Platform/shell combination for which an attach command is templated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExecProfile {
    WinWsl,
    WinDesktop,
    Mac,
    Linux,
}

impl ExecProfile {
    pub const ALL: [ExecProfile; 4] = [
        ExecProfile::WinWsl,
        ExecProfile::WinDesktop,
        ExecProfile::Mac,
        ExecProfile::Linux,
    ];
}

impl fmt::Display for ExecProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecProfile::WinWsl => "win-wsl",
            ExecProfile::WinDesktop => "win-desktop",
            ExecProfile::Mac => "mac",
            ExecProfile::Linux => "linux",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
#[error("unknown exec profile: {0}")]
pub struct ParseExecProfileError(String);

impl FromStr for ExecProfile {
    type Err = ParseExecProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win-wsl" => Ok(ExecProfile::WinWsl),
            "win-desktop" => Ok(ExecProfile::WinDesktop),
            "mac" => Ok(ExecProfile::Mac),
            "linux" => Ok(ExecProfile::Linux),
            other => Err(ParseExecProfileError(other.to_string())),
        }
    }
}

/// Compose ready-to-copy attach commands for the requested profiles.
///
/// Pure and total: every requested profile yields exactly one string, an
/// empty profile set yields an empty map. The container identifier comes
/// from the daemon, never raw user text, and is interpolated verbatim.
pub fn compose_commands(
    container: &str,
    profiles: &[ExecProfile],
    wsl_distro: &str,
    shell: &str,
) -> BTreeMap<ExecProfile, String> {
    profiles
        .iter()
        .map(|&profile| {
            let command = match profile {
                ExecProfile::WinWsl => {
                    format!("wsl -d {wsl_distro} docker exec -it {container} {shell}")
                }
                ExecProfile::WinDesktop => {
                    format!("docker.exe exec -it {container} {shell}")
                }
                ExecProfile::Mac | ExecProfile::Linux => {
                    format!("docker exec -it {container} {shell}")
                }
            };
            (profile, command)
        })
        .collect()
}

/// Configured composer bound to the distro/shell/profile set from settings.
pub struct ExecCommandComposer {
    wsl_distro: String,
    shell: String,
    profiles: Vec<ExecProfile>,
}

impl ExecCommandComposer {
    pub fn new(
        wsl_distro: impl Into<String>,
        shell: impl Into<String>,
        profiles: Vec<ExecProfile>,
    ) -> Self {
        Self {
            wsl_distro: wsl_distro.into(),
            shell: shell.into(),
            profiles,
        }
    }

    pub fn from_settings(settings: &crate::config::ExecSettings) -> Self {
        Self::new(
            settings.wsl_distro.clone(),
            settings.shell.clone(),
            settings.enabled_profiles(),
        )
    }

    pub fn compose(&self, container: &str) -> BTreeMap<ExecProfile, String> {
        compose_commands(container, &self.profiles, &self.wsl_distro, &self.shell)
    }
}
