//! Impls - ports の本番用実装
//!
//! # 含まれる実装
//! - **HttpFeed**: reqwest による上流フィード取得
//! - **RandomTieBreaker**: rand による同点時のラベル選択
//!
//! テスト用の実装（FixedClock, FixedTieBreaker など）は ports 側に置く。

pub mod http_feed;
pub mod random_tie_breaker;

pub use self::http_feed::HttpFeed;
pub use self::random_tie_breaker::RandomTieBreaker;
