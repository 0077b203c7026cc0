//! Ingestor - 上流フィードのポーリングループ
//!
//! # フロー
//! 1. FeedSource::fetch() で payload 取得
//! 2. status != "OK" なら payload ごと読み飛ばす
//! 3. cmd == 2006 のイベントを 1 件ずつ解釈（壊れたイベントはそれだけ飛ばす）
//! 4. Store::resolve() で予測・採点・snapshot・履歴を一括更新（重複 sid は無視）
//! 5. 取得失敗時は retry_delay だけ待つ
//! 6. 結果に関係なく poll_interval だけ待って 1 に戻る
//!
//! ループはプロセスと同じ寿命。停止の手順はない。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::FeedError;
use crate::ports::{Clock, FeedEvent, FeedPayload, FeedSource};
use crate::predictor::Predictor;
use crate::store::Store;

/// Counters for one processed payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Dice-resolution events in the payload.
    pub seen: usize,
    /// New rounds stored.
    pub recorded: usize,
    /// Events whose session id matched the last processed one.
    pub duplicates: usize,
    /// Dice-resolution events that could not be used.
    pub skipped: usize,
}

/// Timing of the ingestion loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub poll_interval: Duration,
    pub retry_delay: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// The single writer of the session state.
pub struct Ingestor {
    feed: Arc<dyn FeedSource>,
    store: Store,
    predictor: Predictor,
    clock: Arc<dyn Clock>,
    timing: LoopTiming,
}

impl Ingestor {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Store,
        predictor: Predictor,
        clock: Arc<dyn Clock>,
        timing: LoopTiming,
    ) -> Self {
        Self {
            feed,
            store,
            predictor,
            clock,
            timing,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run forever.
    pub async fn run(self) {
        info!(
            poll_interval = ?self.timing.poll_interval,
            retry_delay = ?self.timing.retry_delay,
            "ingestion loop started"
        );
        loop {
            if let Err(e) = self.tick().await {
                warn!(error = %e, "feed fetch failed, backing off");
                tokio::time::sleep(self.timing.retry_delay).await;
            }
            tokio::time::sleep(self.timing.poll_interval).await;
        }
    }

    /// One fetch plus processing of its payload.
    pub async fn tick(&self) -> Result<IngestReport, FeedError> {
        let payload = self.feed.fetch().await?;
        let report = self.process_payload(&payload).await;
        if report.recorded > 0 || report.skipped > 0 {
            debug!(?report, "payload processed");
        }
        Ok(report)
    }

    pub async fn process_payload(&self, payload: &FeedPayload) -> IngestReport {
        let mut report = IngestReport::default();
        if !payload.is_ok() {
            debug!(status = %payload.status, "payload status not OK, skipping");
            return report;
        }

        for value in &payload.data {
            let (session_id, dice) = match FeedEvent::parse(value) {
                FeedEvent::Other => continue,
                FeedEvent::Malformed(reason) => {
                    report.seen += 1;
                    report.skipped += 1;
                    warn!(%reason, "skipping malformed dice event");
                    continue;
                }
                FeedEvent::Resolved { session_id, dice } => (session_id, dice),
            };
            report.seen += 1;

            let resolved = self
                .store
                .resolve(session_id, dice, &self.predictor, self.clock.now())
                .await;
            let Some(resolved) = resolved else {
                report.duplicates += 1;
                continue;
            };
            report.recorded += 1;

            let round = &resolved.round;
            info!(
                session = %round.session_id(),
                dice = ?round.dice().faces(),
                total = round.total(),
                label = %round.label(),
                predicted = %round.predicted_label(),
                fallback = resolved.prediction.is_fallback(),
                "round resolved"
            );
            if let Some((prev, verdict)) = &resolved.scored {
                debug!(session = %prev, ?verdict, "previous prediction scored");
            }
        }
        report
    }
}
