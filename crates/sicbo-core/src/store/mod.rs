//! Store - ラウンド履歴・最新 snapshot・採点カウンタの共有状態

pub mod history;
pub mod state;
pub mod views;

pub use self::history::{DEFAULT_CAPACITY, History};
pub use self::state::{Resolved, Store};
pub use self::views::{HistoryView, PredictionView};
