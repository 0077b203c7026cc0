//! Ports - 抽象化レイヤー
//!
//! 外部とのやりとり（上流フィード、時刻、乱数）を trait で切り出す。
//! 実装は `impls` に置き、テストでは差し替える。

pub mod clock;
pub mod feed;
pub mod tie_breaker;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::feed::{DICE_RESULT_CMD, FeedEvent, FeedPayload, FeedSource};
pub use self::tie_breaker::{AlternatingTieBreaker, FixedTieBreaker, TieBreaker};
