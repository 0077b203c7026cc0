//! Feed port - 上流フィードの抽象化
//!
//! 取得（HTTP, タイムアウト, 再試行）は実装側の責務。
//! ここでは payload の形と、イベント 1 件ごとの解釈だけを定義する。

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Dice, FeedError, SessionId};

/// Command code of dice-resolution events.
pub const DICE_RESULT_CMD: i64 = 2006;

/// Status value of a usable payload.
pub const STATUS_OK: &str = "OK";

/// FeedSource は 1 回分の payload を返す
///
/// # Thread Safety
/// - ingestion loop の tokio task から呼ばれるため `Send + Sync`
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedPayload, FeedError>;
}

/// Top-level upstream payload.
///
/// `status` と `data` はどちらも必須。欠けていれば decode error。
/// イベントは 1 件ずつ解釈するため `serde_json::Value` のまま保持する。
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPayload {
    pub status: String,
    pub data: Vec<serde_json::Value>,
}

impl FeedPayload {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Upstream sends session ids as either numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSessionId {
    Number(serde_json::Number),
    Text(String),
}

impl RawSessionId {
    /// Empty strings and zero are treated as absent.
    fn into_session_id(self) -> Option<SessionId> {
        let raw = match self {
            RawSessionId::Number(n) => n.to_string(),
            RawSessionId::Text(s) => s.trim().to_string(),
        };
        if raw.is_empty() || raw == "0" {
            None
        } else {
            Some(SessionId::new(raw))
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    cmd: Option<i64>,
    sid: Option<RawSessionId>,
    d1: Option<i64>,
    d2: Option<i64>,
    d3: Option<i64>,
}

/// How a single upstream event is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Not a dice-resolution event; ignored silently.
    Other,
    /// A dice-resolution event that cannot be used.
    Malformed(String),
    Resolved { session_id: SessionId, dice: Dice },
}

impl FeedEvent {
    pub fn parse(value: &serde_json::Value) -> Self {
        let raw: RawEvent = match RawEvent::deserialize(value) {
            Ok(raw) => raw,
            Err(e) => {
                if value.get("cmd").and_then(|c| c.as_i64()) == Some(DICE_RESULT_CMD) {
                    return FeedEvent::Malformed(e.to_string());
                }
                return FeedEvent::Other;
            }
        };
        if raw.cmd != Some(DICE_RESULT_CMD) {
            return FeedEvent::Other;
        }

        let Some(session_id) = raw.sid.and_then(RawSessionId::into_session_id) else {
            return FeedEvent::Malformed("missing sid".to_string());
        };
        let (Some(d1), Some(d2), Some(d3)) = (raw.d1, raw.d2, raw.d3) else {
            return FeedEvent::Malformed(format!("missing dice for sid={session_id}"));
        };
        let face = |d: i64| u8::try_from(d).ok();
        let dice = match (face(d1), face(d2), face(d3)) {
            (Some(a), Some(b), Some(c)) => Dice::new(a, b, c),
            _ => None,
        };
        match dice {
            Some(dice) => FeedEvent::Resolved { session_id, dice },
            None => FeedEvent::Malformed(format!(
                "dice out of range for sid={session_id}: ({d1},{d2},{d3})"
            )),
        }
    }
}
