//! Predictor - 次の Round のラベルを予測する
//!
//! # フロー
//! 1. 履歴が 3 件未満なら TieBreaker
//! 2. 新しい順の履歴から最大 15 件の Window を作る（古い順）
//! 3. 4 つのシグナルで Scores を集計して正規化
//! 4. 差が 0.15 未満なら TieBreaker、それ以外は高い方
//!
//! TieBreaker を経由しない経路は Window の純粋関数。

pub mod signals;

use std::sync::Arc;

use crate::domain::{Label, Round};
use crate::ports::TieBreaker;

pub use self::signals::{Scores, Vote, WINDOW_SIZE, Window};

/// Fewer prior rounds than this always use the tie breaker.
pub const MIN_HISTORY: usize = 3;

/// Why a prediction came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Basis {
    /// Not enough history.
    InsufficientHistory,
    /// Normalized scores too close to call.
    NearTie(Scores),
    /// Normalized scores with a clear winner.
    Scored(Scores),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub basis: Basis,
}

impl Prediction {
    pub fn is_fallback(&self) -> bool {
        !matches!(self.basis, Basis::Scored(_))
    }
}

#[derive(Clone)]
pub struct Predictor {
    tie_breaker: Arc<dyn TieBreaker>,
}

impl Predictor {
    pub fn new(tie_breaker: Arc<dyn TieBreaker>) -> Self {
        Self { tie_breaker }
    }

    /// Predict the label of the round that is about to resolve.
    ///
    /// `recent_first` must contain only already-resolved rounds, newest first.
    pub fn predict<'a>(&self, recent_first: impl IntoIterator<Item = &'a Round>) -> Prediction {
        let window = Window::from_recent(recent_first);
        if window.len() < MIN_HISTORY {
            return Prediction {
                label: self.tie_breaker.pick(),
                basis: Basis::InsufficientHistory,
            };
        }

        let scores = Scores::collect(&window).normalized();
        match scores.decision() {
            Some(label) => Prediction {
                label,
                basis: Basis::Scored(scores),
            },
            None => Prediction {
                label: self.tie_breaker.pick(),
                basis: Basis::NearTie(scores),
            },
        }
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::domain::{Dice, Label, Round, SessionId};

    /// Dice summing to `total` (3..=18).
    pub fn dice_for_total(total: u8) -> Dice {
        let a = (total - 2).min(6);
        let rest = total - a;
        let b = (rest - 1).min(6);
        Dice::new(a, b, rest - b).unwrap()
    }

    /// Rounds built from chronological totals, returned newest first.
    pub fn history_from_totals(chrono_totals: &[u8]) -> Vec<Round> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        chrono_totals
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                Round::new(SessionId::new(i.to_string()), dice_for_total(t), Label::High, at)
            })
            .rev()
            .collect()
    }
}
