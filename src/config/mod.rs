// ABOUTME: Configuration types and loading for berth.yml.
// ABOUTME: Every field is defaulted; environment variables override file values.

mod env;

use crate::error::{Error, Result};
use crate::exec::ExecProfile;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "berth.yml";
pub const CONFIG_FILENAME_ALT: &str = "berth.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".berth/config.yml";

/// All startup configuration for the dashboard core.
///
/// The core treats these values as immutable for its process lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub daemon: DaemonSettings,

    #[serde(default)]
    pub link: LinkSettings,

    #[serde(default)]
    pub logs: LogSettings,

    #[serde(default)]
    pub action: ActionSettings,

    #[serde(default)]
    pub exec: ExecSettings,

    #[serde(default)]
    pub poll: PollSettings,

    /// Locale passed through to the presentation layer; no string tables
    /// live in this crate.
    #[serde(default = "default_locale")]
    pub locale: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DaemonSettings {
    /// None selects the platform default socket. `tcp://` and `http://`
    /// endpoints connect over TCP, anything else is a unix socket path.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSettings {
    /// Scheme for derived external links on published ports.
    #[serde(default = "default_link_scheme")]
    pub scheme: String,
    /// Host for derived external links on published ports.
    #[serde(default = "default_link_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Lines returned when the caller does not specify a count.
    #[serde(default = "default_log_default_tail")]
    pub default_tail: u64,
    /// Hard ceiling on lines any caller can request.
    #[serde(default = "default_log_max_tail")]
    pub max_tail: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionSettings {
    /// Pause between issuing a lifecycle action and re-reading state.
    #[serde(default = "default_settle_delay", with = "humantime_serde")]
    pub settle_delay: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecSettings {
    /// WSL distribution interpolated into the win-wsl attach command.
    #[serde(default = "default_wsl_distro")]
    pub wsl_distro: String,
    /// Shell opened inside the container.
    #[serde(default = "default_exec_shell")]
    pub shell: String,
    /// Profiles to expose; absent means all of them.
    #[serde(default)]
    pub profiles: Option<Vec<ExecProfile>>,
}

impl ExecSettings {
    pub fn enabled_profiles(&self) -> Vec<ExecProfile> {
        self.profiles
            .clone()
            .unwrap_or_else(|| ExecProfile::ALL.to_vec())
    }
}

/// Refresh intervals consumed by the presentation layer's polling loops.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_auto_refresh", with = "humantime_serde")]
    pub auto_refresh: Duration,
    #[serde(default = "default_log_refresh", with = "humantime_serde")]
    pub log_refresh: Duration,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_link_scheme() -> String {
    "http".to_string()
}

fn default_link_host() -> String {
    "localhost".to_string()
}

fn default_log_default_tail() -> u64 {
    200
}

fn default_log_max_tail() -> u64 {
    5000
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_wsl_distro() -> String {
    "Ubuntu".to_string()
}

fn default_exec_shell() -> String {
    "bash".to_string()
}

fn default_auto_refresh() -> Duration {
    Duration::from_secs(10)
}

fn default_log_refresh() -> Duration {
    Duration::from_secs(5)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daemon: DaemonSettings::default(),
            link: LinkSettings::default(),
            logs: LogSettings::default(),
            action: ActionSettings::default(),
            exec: ExecSettings::default(),
            poll: PollSettings::default(),
            locale: default_locale(),
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            scheme: default_link_scheme(),
            host: default_link_host(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_tail: default_log_default_tail(),
            max_tail: default_log_max_tail(),
        }
    }
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            settle_delay: default_settle_delay(),
        }
    }
}

impl Default for ExecSettings {
    fn default() -> Self {
        Self {
            wsl_distro: default_wsl_distro(),
            shell: default_exec_shell(),
            profiles: None,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            log_refresh: default_log_refresh(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Load settings from `dir`, falling back to defaults when no config
    /// file exists. Checks `berth.yml`, then `berth.yaml`, then
    /// `.berth/config.yml`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for name in [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR] {
            let path = dir.join(name);
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                return Self::from_yaml(&contents);
            }
        }
        Ok(Self::default())
    }

    /// Apply environment variable overrides on top of file/default values.
    ///
    /// Unparseable or out-of-range values leave the existing value in place.
    pub fn apply_env_overrides(&mut self) {
        if let Some(endpoint) = env::string("DOCKER_HOST") {
            self.daemon.endpoint = Some(endpoint);
        }
        if let Some(scheme) = env::string("LINK_SCHEME") {
            self.link.scheme = scheme;
        }
        if let Some(host) = env::string("LINK_HOST") {
            self.link.host = host;
        }
        if let Some(n) = env::positive_u64("LOG_DEFAULT_TAIL") {
            self.logs.default_tail = n;
        }
        if let Some(n) = env::positive_u64("LOG_MAX_TAIL") {
            self.logs.max_tail = n;
        }
        if let Some(d) = env::seconds_f64("ACTION_DELAY_SECONDS") {
            self.action.settle_delay = d;
        }
        if let Some(distro) = env::string("WSL_DISTRO") {
            self.exec.wsl_distro = distro;
        }
        if let Some(shell) = env::string("EXEC_SHELL") {
            self.exec.shell = shell;
        }
        if let Some(profiles) = env::exec_profiles("EXEC_COMMAND_PROFILES") {
            self.exec.profiles = profiles;
        }
        if let Some(secs) = env::positive_u64("AUTO_REFRESH_SECONDS") {
            self.poll.auto_refresh = Duration::from_secs(secs);
        }
        if let Some(secs) = env::positive_u64("LOG_REFRESH_SECONDS") {
            self.poll.log_refresh = Duration::from_secs(secs);
        }
        if let Some(locale) = env::string("APP_LOCALE") {
            self.locale = locale.to_lowercase();
        }
    }

    /// Normalize cross-field invariants: the default tail never exceeds the
    /// maximum, and both stay at least one.
    pub fn normalized(mut self) -> Self {
        self.logs.max_tail = self.logs.max_tail.max(1);
        self.logs.default_tail = self.logs.default_tail.clamp(1, self.logs.max_tail);
        self
    }
}
