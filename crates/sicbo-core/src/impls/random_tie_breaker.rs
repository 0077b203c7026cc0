//! RandomTieBreaker - 本番用の TieBreaker（スレッドローカル RNG）

use crate::domain::Label;
use crate::ports::TieBreaker;

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTieBreaker;

impl TieBreaker for RandomTieBreaker {
    fn pick(&self) -> Label {
        if rand::random::<bool>() {
            Label::High
        } else {
            Label::Low
        }
    }
}
