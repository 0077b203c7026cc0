//! HttpFeed - reqwest による上流フィードの取得
//!
//! - リクエストごとのタイムアウト
//! - 固定の User-Agent
//! - RetryPolicy による回数制限付き再試行

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::app::RetryPolicy;
use crate::domain::FeedError;
use crate::ports::{FeedPayload, FeedSource};

pub const USER_AGENT: &str = concat!("sicbo/", env!("CARGO_PKG_VERSION"));

pub struct HttpFeed {
    client: Client,
    url: String,
    retry: RetryPolicy,
}

impl HttpFeed {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            retry,
        })
    }

    async fn fetch_once(&self) -> Result<FeedPayload, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<FeedPayload, FeedError> {
        let mut attempts = 1;
        loop {
            match self.fetch_once().await {
                Ok(payload) => return Ok(payload),
                Err(e) if self.retry.should_retry(attempts) => {
                    let delay = self.retry.next_delay(attempts);
                    debug!(error = %e, attempts, ?delay, "feed fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
