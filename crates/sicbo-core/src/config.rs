//! Process configuration read from the environment.
//!
//! 未設定のキーはデフォルト値。値が解釈できなければ起動時エラー。

use std::fmt::Display;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use crate::app::{LoopTiming, RetryPolicy};
use crate::domain::ConfigError;

pub const DEFAULT_FEED_URL: &str =
    "https://jakpotgwab.geightdors.net/glms/v1/notify/taixiu?platform_id=g8&gid=vgmn_101";
pub const DEFAULT_SOURCE_ID: &str = "truongdong1920";

/// Largest accepted `SICBO_MAX_HISTORY`.
pub const MAX_HISTORY_LIMIT: usize = 10_000;

/// Base delay between attempts of one fetch when `SICBO_FEED_ATTEMPTS > 1`.
const FEED_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    pub max_history: NonZeroUsize,
    pub feed_url: String,
    pub feed_timeout: Duration,
    pub feed_attempts: u32,
    pub source_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(5),
            max_history: NonZeroUsize::new(crate::store::DEFAULT_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_timeout: Duration::from_secs(10),
            feed_attempts: 1,
            source_id: DEFAULT_SOURCE_ID.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SICBO_HOST") {
            cfg.host = v.trim().to_string();
        }
        if let Some(v) = get("PORT") {
            cfg.port = parse("PORT", &v)?;
        }
        if let Some(v) = get("SICBO_POLL_INTERVAL_SECS") {
            cfg.poll_interval = Duration::from_secs(parse("SICBO_POLL_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = get("SICBO_RETRY_DELAY_SECS") {
            cfg.retry_delay = Duration::from_secs(parse("SICBO_RETRY_DELAY_SECS", &v)?);
        }
        if let Some(v) = get("SICBO_MAX_HISTORY") {
            let max_history: NonZeroUsize = parse("SICBO_MAX_HISTORY", &v)?;
            if max_history.get() > MAX_HISTORY_LIMIT {
                return Err(invalid(
                    "SICBO_MAX_HISTORY",
                    &v,
                    format!("must be at most {MAX_HISTORY_LIMIT}"),
                ));
            }
            cfg.max_history = max_history;
        }
        if let Some(v) = get("SICBO_FEED_URL") {
            cfg.feed_url = v.trim().to_string();
        }
        if let Some(v) = get("SICBO_FEED_TIMEOUT_SECS") {
            let secs: u64 = parse("SICBO_FEED_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("SICBO_FEED_TIMEOUT_SECS", &v, "must be at least 1"));
            }
            cfg.feed_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("SICBO_FEED_ATTEMPTS") {
            let attempts: u32 = parse("SICBO_FEED_ATTEMPTS", &v)?;
            if attempts == 0 {
                return Err(invalid("SICBO_FEED_ATTEMPTS", &v, "must be at least 1"));
            }
            cfg.feed_attempts = attempts;
        }
        if let Some(v) = get("SICBO_SOURCE_ID") {
            cfg.source_id = v.trim().to_string();
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn loop_timing(&self) -> LoopTiming {
        LoopTiming {
            poll_interval: self.poll_interval,
            retry_delay: self.retry_delay,
        }
    }

    pub fn feed_retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.feed_attempts, FEED_RETRY_BASE_DELAY)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, raw, e.to_string()))
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}
