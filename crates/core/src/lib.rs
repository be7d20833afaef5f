pub mod analyzer;
pub mod client;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod render;
pub mod schedule;
pub mod view;

#[cfg(test)]
mod testing;

pub mod config {
    use anyhow::Context;
    use std::str::FromStr;
    use std::time::Duration;

    const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub refresh_interval: Duration,
        pub http_timeout: Option<Duration>,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let refresh_secs = env_number::<u64>(&lookup, "TRADER_REFRESH_INTERVAL_SECS")?
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
            anyhow::ensure!(
                refresh_secs > 0,
                "TRADER_REFRESH_INTERVAL_SECS must be greater than zero"
            );

            Ok(Self {
                api_base_url: lookup("TRADER_API_BASE_URL").filter(|s| !s.trim().is_empty()),
                refresh_interval: Duration::from_secs(refresh_secs),
                http_timeout: env_number::<u64>(&lookup, "TRADER_HTTP_TIMEOUT_SECS")?
                    .map(Duration::from_secs),
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                port: env_number::<u16>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            })
        }

        pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
            self.api_base_url
                .as_deref()
                .context("TRADER_API_BASE_URL is required")
        }
    }

    fn env_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match lookup(key) {
            Some(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<T>()
                .map(Some)
                .with_context(|| format!("{key} must be a non-negative whole number (got {s:?})")),
            _ => Ok(None),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
            let vars: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Settings::from_lookup(|key| vars.get(key).cloned())
        }

        #[test]
        fn defaults_apply_when_unset() {
            let s = settings(&[]).unwrap();
            assert_eq!(s.refresh_interval, Duration::from_secs(300));
            assert_eq!(s.http_timeout, None);
            assert_eq!(s.port, 3000);
            assert!(s.sentry_dsn.is_none());
            assert!(s.require_api_base_url().is_err());
        }

        #[test]
        fn reads_configured_values() {
            let s = settings(&[
                ("TRADER_API_BASE_URL", "http://backend:8000"),
                ("TRADER_REFRESH_INTERVAL_SECS", " 60 "),
                ("TRADER_HTTP_TIMEOUT_SECS", "15"),
                ("PORT", "8080"),
            ])
            .unwrap();
            assert_eq!(s.require_api_base_url().unwrap(), "http://backend:8000");
            assert_eq!(s.refresh_interval, Duration::from_secs(60));
            assert_eq!(s.http_timeout, Some(Duration::from_secs(15)));
            assert_eq!(s.port, 8080);
        }

        #[test]
        fn zero_refresh_interval_is_rejected() {
            let err = settings(&[("TRADER_REFRESH_INTERVAL_SECS", "0")]).unwrap_err();
            assert!(err.to_string().contains("greater than zero"));
        }

        #[test]
        fn malformed_numbers_are_errors() {
            for (key, value) in [
                ("TRADER_REFRESH_INTERVAL_SECS", "5m"),
                ("TRADER_HTTP_TIMEOUT_SECS", "-1"),
                ("PORT", "http"),
                ("PORT", "70000"),
            ] {
                let err = settings(&[(key, value)]).unwrap_err();
                assert!(err.to_string().contains(key), "{key}={value}: {err}");
            }
        }

        #[test]
        fn blank_values_count_as_unset() {
            let s = settings(&[("TRADER_API_BASE_URL", "  "), ("PORT", "")]).unwrap();
            assert!(s.api_base_url.is_none());
            assert_eq!(s.port, 3000);
        }
    }
}
