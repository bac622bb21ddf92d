// ABOUTME: Integration tests for configuration discovery and env overrides.
// ABOUTME: Tests YAML discovery order and the override/fallback rules.

use berth::config::Settings;
use berth::exec::ExecProfile;
use std::fs;
use std::time::Duration;

mod discovery {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.logs.default_tail, 200);
        assert_eq!(settings.link.host, "localhost");
    }

    #[test]
    fn berth_yml_is_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("berth.yml"), "link:\n  host: lan.box\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.link.host, "lan.box");
    }

    #[test]
    fn yml_takes_precedence_over_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("berth.yml"), "locale: pt\n").unwrap();
        fs::write(dir.path().join("berth.yaml"), "locale: de\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.locale, "pt");
    }

    #[test]
    fn hidden_directory_config_is_the_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".berth")).unwrap();
        fs::write(dir.path().join(".berth/config.yml"), "locale: fr\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.locale, "fr");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("berth.yml"), "logs: [not, a, map\n").unwrap();

        assert!(Settings::discover(dir.path()).is_err());
    }
}

mod env_overrides {
    use super::*;

    #[test]
    fn values_override_defaults() {
        temp_env::with_vars(
            [
                ("LINK_SCHEME", Some("https")),
                ("LINK_HOST", Some("dash.example.com")),
                ("LOG_DEFAULT_TAIL", Some("50")),
                ("LOG_MAX_TAIL", Some("100")),
                ("ACTION_DELAY_SECONDS", Some("0.5")),
                ("WSL_DISTRO", Some("Debian")),
                ("EXEC_SHELL", Some("sh")),
                ("APP_LOCALE", Some("PT")),
            ],
            || {
                let mut settings = Settings::default();
                settings.apply_env_overrides();
                let settings = settings.normalized();

                assert_eq!(settings.link.scheme, "https");
                assert_eq!(settings.link.host, "dash.example.com");
                assert_eq!(settings.logs.default_tail, 50);
                assert_eq!(settings.logs.max_tail, 100);
                assert_eq!(settings.action.settle_delay, Duration::from_millis(500));
                assert_eq!(settings.exec.wsl_distro, "Debian");
                assert_eq!(settings.exec.shell, "sh");
                assert_eq!(settings.locale, "pt");
            },
        );
    }

    #[test]
    fn invalid_values_fall_back_silently() {
        temp_env::with_vars(
            [
                ("LOG_DEFAULT_TAIL", Some("not-a-number")),
                ("LOG_MAX_TAIL", Some("0")),
                ("ACTION_DELAY_SECONDS", Some("-1")),
            ],
            || {
                let mut settings = Settings::default();
                settings.apply_env_overrides();

                assert_eq!(settings.logs.default_tail, 200);
                assert_eq!(settings.logs.max_tail, 5000);
                assert_eq!(settings.action.settle_delay, Duration::from_millis(100));
            },
        );
    }

    #[test]
    fn profile_list_parses_and_skips_unknown_entries() {
        temp_env::with_var(
            "EXEC_COMMAND_PROFILES",
            Some("win-wsl, linux, atari"),
            || {
                let mut settings = Settings::default();
                settings.apply_env_overrides();

                assert_eq!(
                    settings.exec.enabled_profiles(),
                    vec![ExecProfile::WinWsl, ExecProfile::Linux]
                );
            },
        );
    }

    #[test]
    fn profile_all_keyword_enables_every_profile() {
        temp_env::with_var("EXEC_COMMAND_PROFILES", Some("all"), || {
            let mut settings = Settings::default();
            settings.apply_env_overrides();

            assert_eq!(settings.exec.enabled_profiles().len(), 4);
        });
    }

    #[test]
    fn default_tail_is_capped_by_overridden_max() {
        temp_env::with_var("LOG_MAX_TAIL", Some("100"), || {
            let mut settings = Settings::default();
            settings.apply_env_overrides();
            let settings = settings.normalized();

            assert_eq!(settings.logs.max_tail, 100);
            assert_eq!(settings.logs.default_tail, 100);
        });
    }

    #[test]
    fn docker_host_overrides_the_daemon_endpoint() {
        temp_env::with_var("DOCKER_HOST", Some("tcp://10.0.0.2:2375"), || {
            let mut settings = Settings::default();
            settings.apply_env_overrides();

            assert_eq!(
                settings.daemon.endpoint.as_deref(),
                Some("tcp://10.0.0.2:2375")
            );
        });
    }
}
