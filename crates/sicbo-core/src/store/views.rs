//! Read-only views copied out of the session state.
//!
//! クエリ面（HTTP）はこれらをそのまま JSON にする。

use serde::Serialize;

use crate::domain::{AccuracyStats, LatestSnapshot, Round};

/// Body of `/api/history`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub history: Vec<Round>,
    pub stats: AccuracyStats,
}

/// Body of `/api/dudoan`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub current: LatestSnapshot,
    pub stats: AccuracyStats,
}
