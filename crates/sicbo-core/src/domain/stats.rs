//! Running accuracy counters for predictions.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::round::{Round, Verdict};

/// Counters of scored predictions.
///
/// Invariant: `total_scored == correct + wrong`. Fields are private so the
/// only way to move them is [`AccuracyStats::score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccuracyStats {
    total_scored: u64,
    correct: u64,
    wrong: u64,
}

impl AccuracyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a round that has just stopped being the newest one.
    ///
    /// The round's own prediction is compared with its own label.
    pub fn score(&mut self, previous: &Round) -> Verdict {
        let verdict = previous.verdict();
        self.total_scored += 1;
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Wrong => self.wrong += 1,
        }
        verdict
    }

    pub fn total_scored(&self) -> u64 {
        self.total_scored
    }

    pub fn correct(&self) -> u64 {
        self.correct
    }

    pub fn wrong(&self) -> u64 {
        self.wrong
    }

    /// correct / total_scored, 0.0 before anything is scored.
    pub fn accuracy(&self) -> f64 {
        if self.total_scored == 0 {
            0.0
        } else {
            self.correct as f64 / self.total_scored as f64
        }
    }
}

impl Serialize for AccuracyStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AccuracyStats", 4)?;
        s.serialize_field("total_scored", &self.total_scored)?;
        s.serialize_field("correct", &self.correct)?;
        s.serialize_field("wrong", &self.wrong)?;
        s.serialize_field("accuracy", &self.accuracy())?;
        s.end()
    }
}
