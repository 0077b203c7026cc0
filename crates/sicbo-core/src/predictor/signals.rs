//! Scoring signals over a window of resolved rounds.
//!
//! 各シグナルは独立した純粋関数で、`Vote`（どちらのラベルに何点入れるか）を返す。
//! 定数は挙動の一部なので変更しないこと。

use serde::Serialize;

use crate::domain::{Label, Round};

/// Maximum number of rounds considered by the predictor.
pub const WINDOW_SIZE: usize = 15;

pub const TREND_THRESHOLD: f64 = 0.25;
pub const TREND_WEIGHT: f64 = 0.25;
pub const PATTERN_MIN_LEN: usize = 4;
pub const PATTERN_WEIGHT: f64 = 0.3;
pub const MEAN_HIGH_ABOVE: f64 = 10.0;
pub const MEAN_LOW_BELOW: f64 = 8.0;
pub const MEAN_WEIGHT: f64 = 0.2;
pub const STREAK_REVERSAL_LEN: usize = 6;
pub const STREAK_REVERSAL_WEIGHT: f64 = 0.35;
pub const STREAK_MOMENTUM_LEN: usize = 4;
pub const STREAK_MOMENTUM_WEIGHT: f64 = 0.15;
/// Normalized score gap below which the decision falls back to the tie breaker.
pub const DECISION_MARGIN: f64 = 0.15;

/// The newest ≤ [`WINDOW_SIZE`] rounds in chronological (oldest-first) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    labels: Vec<Label>,
    totals: Vec<u8>,
}

impl Window {
    /// `recent_first` は新しい順。先頭 15 件を取り、古い順に並べ替える。
    pub fn from_recent<'a>(recent_first: impl IntoIterator<Item = &'a Round>) -> Self {
        let mut labels = Vec::with_capacity(WINDOW_SIZE);
        let mut totals = Vec::with_capacity(WINDOW_SIZE);
        for round in recent_first.into_iter().take(WINDOW_SIZE) {
            labels.push(round.label());
            totals.push(round.total());
        }
        labels.reverse();
        totals.reverse();
        Self { labels, totals }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn totals(&self) -> &[u8] {
        &self.totals
    }

    /// Label and length of the run of identical labels ending at the newest round.
    pub fn streak(&self) -> Option<(Label, usize)> {
        let last = *self.labels.last()?;
        let len = self
            .labels
            .iter()
            .rev()
            .take_while(|&&label| label == last)
            .count();
        Some((last, len))
    }

    fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }
}

/// A weighted vote for one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vote {
    pub label: Label,
    pub weight: f64,
}

impl Vote {
    fn new(label: Label, weight: f64) -> Self {
        Self { label, weight }
    }
}

/// Mean reversion: a lopsided window votes for the minority label.
pub fn trend_balance(window: &Window) -> Option<Vote> {
    if window.is_empty() {
        return None;
    }
    let high = window.count(Label::High);
    let low = window.count(Label::Low);
    let imbalance = high.abs_diff(low) as f64 / window.len() as f64;
    if imbalance < TREND_THRESHOLD {
        return None;
    }
    let minority = if high > low { Label::Low } else { Label::High };
    Some(Vote::new(minority, TREND_WEIGHT))
}

/// Alternation continues: H,L,H votes Low and L,H,L votes High.
pub fn short_pattern(window: &Window) -> Option<Vote> {
    if window.len() < PATTERN_MIN_LEN {
        return None;
    }
    match window.labels()[window.len() - 3..] {
        [Label::High, Label::Low, Label::High] => Some(Vote::new(Label::Low, PATTERN_WEIGHT)),
        [Label::Low, Label::High, Label::Low] => Some(Vote::new(Label::High, PATTERN_WEIGHT)),
        _ => None,
    }
}

/// Mean total above 10 votes High, below 8 votes Low.
pub fn mean_deviation(window: &Window) -> Option<Vote> {
    if window.is_empty() {
        return None;
    }
    let sum: u32 = window.totals().iter().map(|&t| u32::from(t)).sum();
    let mean = f64::from(sum) / window.len() as f64;
    if mean > MEAN_HIGH_ABOVE {
        Some(Vote::new(Label::High, MEAN_WEIGHT))
    } else if mean < MEAN_LOW_BELOW {
        Some(Vote::new(Label::Low, MEAN_WEIGHT))
    } else {
        None
    }
}

/// Long streaks reverse, medium streaks continue.
pub fn streak(window: &Window) -> Option<Vote> {
    let (label, len) = window.streak()?;
    if len >= STREAK_REVERSAL_LEN {
        Some(Vote::new(label.opposite(), STREAK_REVERSAL_WEIGHT))
    } else if len >= STREAK_MOMENTUM_LEN {
        Some(Vote::new(label, STREAK_MOMENTUM_WEIGHT))
    } else {
        None
    }
}

/// Accumulated votes for both labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Scores {
    pub high: f64,
    pub low: f64,
}

impl Scores {
    /// Sum every signal's vote for the window (not normalized).
    pub fn collect(window: &Window) -> Self {
        let mut scores = Scores::default();
        let votes = [
            trend_balance(window),
            short_pattern(window),
            mean_deviation(window),
            streak(window),
        ];
        for vote in votes.into_iter().flatten() {
            scores.add(vote);
        }
        scores
    }

    pub fn add(&mut self, vote: Vote) {
        match vote.label {
            Label::High => self.high += vote.weight,
            Label::Low => self.low += vote.weight,
        }
    }

    /// Scale both scores so they sum to 1. No-op when both are zero.
    pub fn normalized(self) -> Self {
        let sum = self.high + self.low;
        if sum > 0.0 {
            Self {
                high: self.high / sum,
                low: self.low / sum,
            }
        } else {
            self
        }
    }

    /// The winning label, or `None` when the gap is below [`DECISION_MARGIN`].
    pub fn decision(&self) -> Option<Label> {
        if (self.high - self.low).abs() < DECISION_MARGIN {
            None
        } else if self.high > self.low {
            Some(Label::High)
        } else {
            Some(Label::Low)
        }
    }
}
