use tracing_subscriber::EnvFilter;

/// Per-target overrides appended to the user filter to keep connection-level chatter quiet.
const QUIET_TARGETS: &str = "hyper_util=warn,reqwest=warn";

/// Log filter from `SPORTSEE_LOG_LEVEL`, falling back to `RUST_LOG`, then `info`.
pub fn log_filter_from_env() -> String {
    log_filter_from_env_with(|k| std::env::var(k).ok())
}

pub fn log_filter_from_env_with<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get("SPORTSEE_LOG_LEVEL")
        .or_else(|| get("RUST_LOG"))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Build the subscriber filter; an unparsable `log_env` falls back to `info`.
pub fn env_filter(log_env: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{log_env},{QUIET_TARGETS}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_TARGETS}")))
}

pub fn init_tracing(log_env: &str) {
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(log_env))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn sportsee_log_level_takes_priority() {
        let filter = log_filter_from_env_with(|k| match k {
            "SPORTSEE_LOG_LEVEL" => Some("debug".into()),
            "RUST_LOG" => Some("warn".into()),
            _ => None,
        });
        assert_eq!(filter, "debug");
    }

    #[test]
    fn falls_back_to_rust_log_then_info() {
        let filter = log_filter_from_env_with(|k| (k == "RUST_LOG").then(|| "warn".to_string()));
        assert_eq!(filter, "warn");
        assert_eq!(log_filter_from_env_with(|_| None), "info");
    }

    #[test]
    fn invalid_filter_falls_back_to_info() {
        assert!(EnvFilter::try_new(format!("invalid[[[filter,{QUIET_TARGETS}")).is_err());
        let filter = env_filter("invalid[[[filter");
        assert_eq!(filter.to_string(), env_filter("info").to_string());
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn valid_filter_is_kept() {
        let filter = env_filter("debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert_ne!(filter.to_string(), env_filter("info").to_string());
    }
}
