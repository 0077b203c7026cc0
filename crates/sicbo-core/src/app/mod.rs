//! App - アプリケーション層
//!
//! ports と store を組み合わせてループを動かす。
//!
//! # 主要コンポーネント
//! - **Ingestor**: 上流フィードのポーリング（唯一の書き手）
//! - **RetryPolicy**: 1 回の取得における再試行

pub mod ingest_loop;
pub mod retry;

pub use self::ingest_loop::{IngestReport, Ingestor, LoopTiming};
pub use self::retry::RetryPolicy;
