//! Errors - エラー型と分類
//!
//! - FeedError: 上流フィードの取得失敗（すべて一時的、ループは待機して再試行）
//! - ConfigError: 起動時の設定エラー（致命的）

use thiserror::Error;

/// Failure to obtain a payload from the upstream feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed transport error: {0}")]
    Transport(String),

    #[error("feed returned http status {0}")]
    Status(u16),

    #[error("feed payload could not be decoded: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
