//! Session state shared by the ingestion loop (single writer) and queries.
//!
//! # 排他制御
//! - LatestSnapshot / History / AccuracyStats / dedup cursor を 1 つの RwLock で守る
//! - 1 Round 分の更新（予測・採点・snapshot 置換・履歴挿入・cursor 更新）は
//!   1 回の write lock 内で完結する。読み手が途中状態を見ることはない
//! - 読み手は read lock を取ってコピーを作り、すぐに離す

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::history::History;
use super::views::{HistoryView, PredictionView};
use crate::domain::{AccuracyStats, Dice, LatestSnapshot, Round, SessionId, Verdict};
use crate::predictor::{Prediction, Predictor};

/// Everything guarded by the store lock.
#[derive(Debug)]
struct SessionState {
    latest: LatestSnapshot,
    history: History,
    stats: AccuracyStats,
    /// Last processed session id (dedup cursor).
    last_session: Option<SessionId>,
}

/// Outcome of resolving one new round.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub round: Round,
    pub prediction: Prediction,
    /// The previous latest round, now scored.
    pub scored: Option<(SessionId, Verdict)>,
}

/// Cloneable handle to the shared session state.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<RwLock<SessionState>>,
}

impl Store {
    pub fn new(source_id: impl Into<String>, capacity: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState {
                latest: LatestSnapshot::empty(source_id),
                history: History::new(capacity),
                stats: AccuracyStats::new(),
                last_session: None,
            })),
        }
    }

    /// Resolve a dice event into a new round.
    ///
    /// Returns `None` when `session_id` equals the last processed one.
    /// Otherwise, inside one write lock: predict from the current history,
    /// score the previous latest round, replace the snapshot, prepend to the
    /// history and advance the dedup cursor.
    pub async fn resolve(
        &self,
        session_id: SessionId,
        dice: Dice,
        predictor: &Predictor,
        now: DateTime<Utc>,
    ) -> Option<Resolved> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;

        if state.last_session.as_ref() == Some(&session_id) {
            return None;
        }

        let prediction = predictor.predict(state.history.iter());
        let scored = state
            .latest
            .round
            .as_ref()
            .map(|prev| (prev.session_id().clone(), state.stats.score(prev)));

        let round = Round::new(session_id.clone(), dice, prediction.label, now);
        state.latest.round = Some(round.clone());
        state.history.record(round.clone());
        state.last_session = Some(session_id);

        Some(Resolved {
            round,
            prediction,
            scored,
        })
    }

    pub async fn latest(&self) -> LatestSnapshot {
        self.inner.read().await.latest.clone()
    }

    pub async fn history_view(&self) -> HistoryView {
        let state = self.inner.read().await;
        HistoryView {
            history: state.history.snapshot_all(),
            stats: state.stats,
        }
    }

    pub async fn prediction_view(&self) -> PredictionView {
        let state = self.inner.read().await;
        PredictionView {
            current: state.latest.clone(),
            stats: state.stats,
        }
    }

    pub async fn stats(&self) -> AccuracyStats {
        self.inner.read().await.stats
    }

    pub async fn last_session(&self) -> Option<SessionId> {
        self.inner.read().await.last_session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;
    use crate::ports::{AlternatingTieBreaker, FixedTieBreaker};
    use crate::predictor::test_support::dice_for_total;

    fn store(cap: usize) -> Store {
        Store::new("test-source", NonZeroUsize::new(cap).unwrap())
    }

    fn predictor() -> Predictor {
        Predictor::new(Arc::new(AlternatingTieBreaker::new()))
    }

    async fn push(store: &Store, predictor: &Predictor, sid: &str, total: u8) -> Option<Resolved> {
        store
            .resolve(SessionId::new(sid), dice_for_total(total), predictor, Utc::now())
            .await
    }

    #[tokio::test]
    async fn empty_store_exposes_identity_only() {
        let s = store(5);
        let latest = s.latest().await;
        assert_eq!(latest.id, "test-source");
        assert!(latest.round.is_none());
        assert!(s.history_view().await.history.is_empty());
        assert_eq!(s.stats().await.total_scored(), 0);
    }

    #[tokio::test]
    async fn repeated_session_id_is_recorded_once() {
        let s = store(5);
        let p = predictor();
        assert!(push(&s, &p, "100", 6).await.is_some());
        assert!(push(&s, &p, "100", 18).await.is_none());

        let view = s.history_view().await;
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].total(), 6);
        assert_eq!(s.last_session().await, Some(SessionId::new("100")));
    }

    #[tokio::test]
    async fn only_the_last_session_is_deduplicated() {
        let s = store(5);
        let p = predictor();
        push(&s, &p, "1", 6).await;
        push(&s, &p, "2", 6).await;
        // upstream may reuse an older id; only the immediate repeat is ignored
        assert!(push(&s, &p, "1", 6).await.is_some());
        assert_eq!(s.history_view().await.history.len(), 3);
    }

    #[tokio::test]
    async fn every_round_but_the_newest_is_scored_once() {
        let s = store(50);
        let p = predictor();
        let n = 20;
        for i in 0..=n {
            let total = if i % 3 == 0 { 14 } else { 7 };
            push(&s, &p, &i.to_string(), total).await;
        }
        let stats = s.stats().await;
        assert_eq!(stats.total_scored(), n as u64);
        assert_eq!(stats.correct() + stats.wrong(), stats.total_scored());
    }

    #[tokio::test]
    async fn previous_round_is_scored_against_its_own_label() {
        let s = store(5);
        let p = Predictor::new(Arc::new(FixedTieBreaker(Label::High)));

        // predicted High (fallback), resolves Low
        push(&s, &p, "1", 6).await;
        assert_eq!(s.stats().await.total_scored(), 0);

        // predicted High (fallback), resolves High; scores round 1 as wrong
        let second = push(&s, &p, "2", 15).await.unwrap();
        assert_eq!(second.scored, Some((SessionId::new("1"), Verdict::Wrong)));

        // scores round 2: High == High
        let third = push(&s, &p, "3", 6).await.unwrap();
        assert_eq!(third.scored, Some((SessionId::new("2"), Verdict::Correct)));

        let stats = s.stats().await;
        assert_eq!((stats.total_scored(), stats.correct(), stats.wrong()), (2, 1, 1));
    }

    #[tokio::test]
    async fn prediction_uses_only_older_rounds() {
        let s = store(50);
        let p = predictor();
        for (i, total) in [11u8, 11, 11, 11, 11, 11].into_iter().enumerate() {
            push(&s, &p, &i.to_string(), total).await;
        }
        // six High rounds before it: reversal toward Low regardless of its own dice
        let r = push(&s, &p, "next", 18).await.unwrap();
        assert_eq!(r.round.predicted_label(), Label::Low);
        assert_eq!(r.round.label(), Label::High);
    }

    #[tokio::test]
    async fn snapshot_and_history_agree_after_each_round() {
        let s = store(3);
        let p = predictor();
        for i in 0..10 {
            push(&s, &p, &format!("s{i}"), 9).await;
            let view = s.prediction_view().await;
            let history = s.history_view().await;
            assert_eq!(view.current.round.as_ref(), history.history.first());
            assert!(history.history.len() <= 3);
        }
    }

    #[tokio::test]
    async fn concurrent_readers_never_see_partial_rounds() {
        let s = store(10);
        let writer = {
            let s = s.clone();
            tokio::spawn(async move {
                let p = predictor();
                for i in 0..200 {
                    push(&s, &p, &i.to_string(), 3 + (i % 16) as u8).await;
                    tokio::task::yield_now().await;
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let s = s.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let view = s.prediction_view().await;
                        if let Some(round) = view.current.round {
                            assert_eq!(round.total(), round.dice().total());
                        }
                        let h = s.history_view().await;
                        let scored = h.stats.total_scored() as usize;
                        assert_eq!(h.stats.correct() + h.stats.wrong(), h.stats.total_scored());
                        // stats and history are copied under the same lock
                        assert!(h.history.is_empty() || scored + 1 >= h.history.len());
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for r in readers {
            r.await.unwrap();
        }
        assert_eq!(s.stats().await.total_scored(), 199);
    }
}
