use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::stance::Stance;
use crate::utils::now_millis;

const DEFAULT_ACTOR: &str = "Player";

fn default_actor() -> String {
    DEFAULT_ACTOR.into()
}

/// 一次出牌选择：卡牌 + 姿态 + 选择者。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TacticalChoice {
    #[serde(default = "default_actor")]
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance: Option<Stance>,
    #[serde(default)]
    pub created_at_ms: u64,
}

impl TacticalChoice {
    pub fn new(card: Card, stance: Stance, actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            card: Some(card),
            stance: Some(stance),
            created_at_ms: now_millis(),
        }
    }

    pub fn anonymous(card: Card, stance: Stance) -> Self {
        Self::new(card, stance, DEFAULT_ACTOR)
    }

    pub fn effective_power(&self) -> u32 {
        match (&self.card, self.stance) {
            (Some(card), Some(stance)) => stance.effective_power(card.attack(), card.defense()),
            _ => 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.stance.is_some()
            && self
                .card
                .as_ref()
                .map(Card::is_battle_eligible)
                .unwrap_or(false)
    }

    fn level(&self) -> u8 {
        self.card.as_ref().map(Card::level).unwrap_or(0)
    }

    /// 对拼排序：先比有效战力，战力相同再比等级；两者都相同即为平局。
    pub fn contest(&self, other: &TacticalChoice) -> Ordering {
        self.effective_power()
            .cmp(&other.effective_power())
            .then_with(|| self.level().cmp(&other.level()))
    }

    pub fn defeats(&self, other: &TacticalChoice) -> bool {
        self.contest(other) == Ordering::Greater
    }

    pub fn description(&self) -> String {
        match (&self.card, self.stance) {
            (Some(card), Some(stance)) => format!(
                "{} chose {} in {} (effective power {})",
                self.actor,
                card.name(),
                stance.display_name(),
                self.effective_power()
            ),
            _ => "Invalid choice".into(),
        }
    }
}

impl fmt::Display for TacticalChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.stance.map(|stance| stance.symbol()).unwrap_or("❓"),
            self.card.as_ref().map(Card::name).unwrap_or("???"),
            self.effective_power()
        )
    }
}
