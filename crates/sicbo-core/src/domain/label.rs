//! Label - 出目合計の二値分類
//!
//! 3 個のサイコロの合計で Low / High を決める。
//! 境界値 10 はゲームのルールで固定（最小 3、最大 18）。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 合計がこの値以下なら Low
pub const LOW_MAX_TOTAL: u8 = 10;

/// Binary classification of a round's dice total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Low,
    High,
}

impl Label {
    /// The other label.
    pub fn opposite(self) -> Self {
        match self {
            Label::Low => Label::High,
            Label::High => Label::Low,
        }
    }

    pub fn from_total(total: u8) -> Self {
        if total <= LOW_MAX_TOTAL {
            Label::Low
        } else {
            Label::High
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Low => f.write_str("Low"),
            Label::High => f.write_str("High"),
        }
    }
}

/// 3 つの出目を分類する
///
/// 入力は検証済み（1..=6）である前提。エラーは返さない。
pub fn classify(d1: u8, d2: u8, d3: u8) -> Label {
    Label::from_total(d1 + d2 + d3)
}
