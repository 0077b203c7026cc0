//! Domain model (labels, rounds, accuracy counters, errors).

pub mod errors;
pub mod label;
pub mod round;
pub mod stats;

pub use self::errors::{ConfigError, FeedError};
pub use self::label::{Label, classify};
pub use self::round::{Dice, LatestSnapshot, Round, SessionId, Verdict};
pub use self::stats::AccuracyStats;
