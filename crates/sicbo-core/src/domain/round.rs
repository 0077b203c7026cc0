//! Round model: one resolved dice outcome.
//!
//! Round は作成時に一度だけ予測ラベルを持ち、次の Round が入るまでは
//! "pending"、次の Round の挿入で "scored" になる。
//! scored かどうかはフラグではなく履歴上の位置で決まる（先頭 = pending）。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::label::Label;

/// Valid face values of one die.
pub const DIE_FACES: std::ops::RangeInclusive<u8> = 1..=6;

/// Upstream session identifier.
///
/// Opaque: only equality with the last processed id matters, never ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three validated dice faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dice {
    #[serde(rename = "dice_1")]
    d1: u8,
    #[serde(rename = "dice_2")]
    d2: u8,
    #[serde(rename = "dice_3")]
    d3: u8,
}

impl Dice {
    /// Returns `None` when any face is outside 1..=6.
    pub fn new(d1: u8, d2: u8, d3: u8) -> Option<Self> {
        [d1, d2, d3]
            .iter()
            .all(|d| DIE_FACES.contains(d))
            .then_some(Self { d1, d2, d3 })
    }

    pub fn faces(&self) -> [u8; 3] {
        [self.d1, self.d2, self.d3]
    }

    pub fn total(&self) -> u8 {
        self.d1 + self.d2 + self.d3
    }

    pub fn label(&self) -> Label {
        super::label::classify(self.d1, self.d2, self.d3)
    }
}

/// Result of comparing a round's prediction with its own label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// One resolved game outcome.
///
/// `total` と `label` は出目から導出されるため、外部から書き換えられない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    session_id: SessionId,
    #[serde(flatten)]
    dice: Dice,
    total: u8,
    label: Label,
    predicted_label: Label,
    resolved_at: DateTime<Utc>,
}

impl Round {
    pub fn new(
        session_id: SessionId,
        dice: Dice,
        predicted_label: Label,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            dice,
            total: dice.total(),
            label: dice.label(),
            predicted_label,
            resolved_at,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn dice(&self) -> Dice {
        self.dice
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn predicted_label(&self) -> Label {
        self.predicted_label
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn verdict(&self) -> Verdict {
        if self.predicted_label == self.label {
            Verdict::Correct
        } else {
            Verdict::Wrong
        }
    }
}

/// Single-slot projection of the newest round plus fixed identity metadata.
///
/// Before the first round arrives only `id` is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSnapshot {
    pub id: String,
    #[serde(flatten)]
    pub round: Option<Round>,
}

impl LatestSnapshot {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            round: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn dice_rejects_out_of_range_faces() {
        assert!(Dice::new(0, 1, 1).is_none());
        assert!(Dice::new(1, 7, 1).is_none());
        assert_eq!(Dice::new(6, 6, 6).unwrap().total(), 18);
    }

    #[test]
    fn round_derives_total_and_label() {
        let round = Round::new(
            SessionId::new("42"),
            Dice::new(4, 3, 4).unwrap(),
            Label::Low,
            at(),
        );
        assert_eq!(round.total(), 11);
        assert_eq!(round.label(), Label::High);
        assert_eq!(round.verdict(), Verdict::Wrong);
    }

    #[test]
    fn round_serializes_flat() {
        let round = Round::new(
            SessionId::new("42"),
            Dice::new(3, 2, 1).unwrap(),
            Label::Low,
            at(),
        );
        let v = serde_json::to_value(&round).unwrap();
        assert_eq!(v["session_id"], "42");
        assert_eq!(v["dice_1"], 3);
        assert_eq!(v["dice_3"], 1);
        assert_eq!(v["total"], 6);
        assert_eq!(v["label"], "Low");
        assert_eq!(v["predicted_label"], "Low");
        assert_eq!(v["resolved_at"], "2024-01-01T12:00:00Z");
    }

    #[test]
    fn empty_snapshot_only_carries_identity() {
        let v = serde_json::to_value(LatestSnapshot::empty("src")).unwrap();
        assert_eq!(v, serde_json::json!({ "id": "src" }));
    }

    #[test]
    fn filled_snapshot_is_flat() {
        let round = Round::new(
            SessionId::new("7"),
            Dice::new(6, 6, 6).unwrap(),
            Label::High,
            at(),
        );
        let snapshot = LatestSnapshot {
            id: "src".to_string(),
            round: Some(round),
        };
        let v = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(v["id"], "src");
        assert_eq!(v["session_id"], "7");
        assert_eq!(v["label"], "High");
    }
}
