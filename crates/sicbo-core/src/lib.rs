//! sicbo-core
//!
//! 上流のサイコロ結果フィードを取り込み、Low / High を予測し、
//! 予測の当たり外れを数えるためのコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Label, Round, AccuracyStats, errors）
//! - **ports**: 抽象化レイヤー（FeedSource, Clock, TieBreaker）
//! - **impls**: ports の本番用実装（HttpFeed, RandomTieBreaker）
//! - **predictor**: 直近の履歴から次のラベルを予測するヒューリスティック
//! - **store**: 履歴・最新 snapshot・採点カウンタの共有状態
//! - **app**: ポーリングループと再試行ポリシー
//! - **config**: 環境変数からの設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod predictor;
pub mod store;

pub use app::{IngestReport, Ingestor, LoopTiming, RetryPolicy};
pub use config::Config;
pub use domain::{AccuracyStats, Label, LatestSnapshot, Round, SessionId, classify};
pub use predictor::Predictor;
pub use store::{HistoryView, PredictionView, Store};
