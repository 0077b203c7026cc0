//! TieBreaker port - 予測が決めきれないときのラベル選択
//!
//! 履歴が短いとき、またはスコア差が小さいときに使う。
//! 履歴には依存してはいけない。本番は乱数（impls::RandomTieBreaker）、
//! テストは固定値や交互の値で差し替える。

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::Label;

pub trait TieBreaker: Send + Sync {
    fn pick(&self) -> Label;
}

/// Always returns the same label.
#[derive(Debug, Clone, Copy)]
pub struct FixedTieBreaker(pub Label);

impl TieBreaker for FixedTieBreaker {
    fn pick(&self) -> Label {
        self.0
    }
}

/// Alternates High, Low, High, ... starting from High.
#[derive(Debug, Default)]
pub struct AlternatingTieBreaker {
    low_next: AtomicBool,
}

impl AlternatingTieBreaker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TieBreaker for AlternatingTieBreaker {
    fn pick(&self) -> Label {
        if self.low_next.fetch_xor(true, Ordering::Relaxed) {
            Label::Low
        } else {
            Label::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_flips_every_call() {
        let tb = AlternatingTieBreaker::new();
        assert_eq!(tb.pick(), Label::High);
        assert_eq!(tb.pick(), Label::Low);
        assert_eq!(tb.pick(), Label::High);
    }
}
