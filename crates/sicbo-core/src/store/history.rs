//! Bounded round history, newest first.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::domain::Round;

/// Default number of rounds kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Upper bound on what is reserved up front; larger histories grow on demand.
const PREALLOC_LIMIT: usize = 1024;

/// Fixed-capacity history.
///
/// - 挿入は常に先頭
/// - 容量を超えたら末尾（最も古い Round）を捨てる
/// - 順序は到着順。session id の大小は見ない
#[derive(Debug, Clone)]
pub struct History {
    rounds: VecDeque<Round>,
    capacity: NonZeroUsize,
}

impl History {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            rounds: VecDeque::with_capacity(capacity.get().min(PREALLOC_LIMIT)),
            capacity,
        }
    }

    /// Insert at the front, returning the evicted oldest round if any.
    pub fn record(&mut self, round: Round) -> Option<Round> {
        self.rounds.push_front(round);
        if self.rounds.len() > self.capacity.get() {
            self.rounds.pop_back()
        } else {
            None
        }
    }

    pub fn latest(&self) -> Option<&Round> {
        self.rounds.front()
    }

    /// Copy of every stored round, newest first.
    pub fn snapshot_all(&self) -> Vec<Round> {
        self.rounds.iter().cloned().collect()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Label, SessionId};
    use crate::predictor::test_support::dice_for_total;
    use chrono::Utc;

    fn round(sid: usize) -> Round {
        Round::new(SessionId::new(sid.to_string()), dice_for_total(9), Label::Low, Utc::now())
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_history_has_no_latest() {
        let history = History::new(capacity(3));
        assert!(history.latest().is_none());
        assert!(history.snapshot_all().is_empty());
    }

    #[test]
    fn record_inserts_at_front() {
        let mut history = History::new(capacity(3));
        history.record(round(1));
        history.record(round(2));
        assert_eq!(history.latest().unwrap().session_id().as_str(), "2");
        let ids: Vec<_> = history.iter().map(|r| r.session_id().to_string()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn overflow_evicts_oldest_and_keeps_newest_in_order() {
        let cap = 5;
        let mut history = History::new(capacity(cap));
        let mut evicted = Vec::new();
        for sid in 1..=12 {
            if let Some(old) = history.record(round(sid)) {
                evicted.push(old.session_id().to_string());
            }
        }

        assert_eq!(history.len(), cap);
        let ids: Vec<_> = history
            .snapshot_all()
            .iter()
            .map(|r| r.session_id().to_string())
            .collect();
        assert_eq!(ids, ["12", "11", "10", "9", "8"]);
        assert_eq!(evicted, ["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn order_is_arrival_not_session_value() {
        let mut history = History::new(capacity(3));
        history.record(round(30));
        history.record(round(4));
        assert_eq!(history.latest().unwrap().session_id().as_str(), "4");
    }

    #[test]
    fn huge_capacity_does_not_reserve_it_up_front() {
        let mut history = History::new(NonZeroUsize::MAX);
        history.record(round(1));
        history.record(round(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), usize::MAX);
    }

    #[test]
    fn capacity_one_keeps_only_latest() {
        let mut history = History::new(capacity(1));
        history.record(round(1));
        let evicted = history.record(round(2));
        assert_eq!(evicted.unwrap().session_id().as_str(), "1");
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 1);
    }
}
