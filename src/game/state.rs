use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::choice::TacticalChoice;
use super::rules::DuelError;

/// 先拿到该胜场数的一方赢得对决。
pub const WINNING_SCORE: u8 = 2;
pub const INITIAL_LIVES: u8 = 3;
pub const MIN_DECK_SIZE: usize = 3;

pub const DEFAULT_HUMAN_NAME: &str = "Human Player";
pub const DEFAULT_AUTOMATED_NAME: &str = "Strategic AI";

/// 对决双方。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Human,
    Automated,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Human => Side::Automated,
            Side::Automated => Side::Human,
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "player" => Ok(Side::Human),
            "automated" | "ai" | "opponent" => Ok(Side::Automated),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => f.write_str("human"),
            Side::Automated => f.write_str("automated"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DuelStatus {
    #[default]
    Idle,
    Active,
    Completed,
}

/// [`DuelEvent::PhaseChanged`] 携带的阶段标签。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusPhase {
    Starting,
    AwaitingHuman,
    Resolving,
    HumanTurn,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RoundOutcome {
    Won { winner: Side },
    Tie,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            RoundOutcome::Won { winner } => Some(*winner),
            RoundOutcome::Tie => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuelOutcome {
    /// 双方胜场相同时为 `None`。
    pub winner: Option<Side>,
    pub rounds_played: u32,
}

/// 对决事件流，由宿主订阅并呈现。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DuelEvent {
    DuelStarted {
        leader: Side,
    },
    RoundResolved {
        human: TacticalChoice,
        automated: TacticalChoice,
        leader: Side,
        outcome: RoundOutcome,
    },
    ScoreUpdated {
        human_victories: u8,
        automated_victories: u8,
    },
    DuelCompleted {
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Side>,
    },
    Error {
        error: DuelError,
        message: String,
    },
    CardsRemoved {
        human: Vec<Card>,
        automated: Vec<Card>,
    },
    AutomatedSelected {
        choice: TacticalChoice,
    },
    PhaseChanged {
        phase: StatusPhase,
        message: String,
    },
    BattleStatistics {
        human_power: u32,
        automated_power: u32,
        difference: i64,
    },
}

impl DuelEvent {
    pub fn error(error: DuelError) -> Self {
        let message = error.to_string();
        DuelEvent::Error { error, message }
    }

    pub fn phase(phase: StatusPhase, message: impl Into<String>) -> Self {
        DuelEvent::PhaseChanged {
            phase,
            message: message.into(),
        }
    }
}

/// 单方的对决状态：卡组、剩余卡池、胜场、生命与待结算的选择。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Duelist {
    pub side: Side,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deck: Vec<Card>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pool: Vec<Card>,
    pub victories: u8,
    pub lives: u8,
    pub direct_strikes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<TacticalChoice>,
}

impl Duelist {
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
            deck: Vec::new(),
            pool: Vec::new(),
            victories: 0,
            lives: INITIAL_LIVES,
            direct_strikes: 0,
            pending: None,
        }
    }

    /// 为新对决重置计数，卡池为未洗牌的卡组副本。
    pub fn reset_with_deck(&mut self, deck: Vec<Card>) {
        self.pool = deck.clone();
        self.deck = deck;
        self.victories = 0;
        self.lives = INITIAL_LIVES;
        self.direct_strikes = 0;
        self.pending = None;
    }

    pub fn find_in_pool_index(&self, card_id: CardId) -> Option<usize> {
        self.pool.iter().position(|card| card.id() == card_id)
    }

    pub fn holds(&self, card_id: CardId) -> bool {
        self.find_in_pool_index(card_id).is_some()
    }

    pub fn remove_from_pool(&mut self, card_id: CardId) -> Option<Card> {
        let idx = self.find_in_pool_index(card_id)?;
        Some(self.pool.remove(idx))
    }

    pub fn record_round_win(&mut self) {
        self.victories = self.victories.saturating_add(1);
        self.direct_strikes = self.direct_strikes.saturating_add(1);
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn is_defeated(&self) -> bool {
        self.lives == 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuelStatistics {
    pub rounds_played: u32,
    pub human_direct_strikes: u32,
    pub automated_direct_strikes: u32,
}

impl fmt::Display for DuelStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rounds: {} | Direct strikes - Human: {}, Automated: {}",
            self.rounds_played, self.human_direct_strikes, self.automated_direct_strikes
        )
    }
}

/// 对决整体状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuelState {
    pub human: Duelist,
    pub automated: Duelist,
    #[serde(default)]
    pub status: DuelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<Side>,
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<DuelEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DuelOutcome>,
}

impl DuelState {
    pub fn new(human_name: impl Into<String>, automated_name: impl Into<String>) -> Self {
        Self {
            human: Duelist::new(Side::Human, human_name),
            automated: Duelist::new(Side::Automated, automated_name),
            status: DuelStatus::Idle,
            leader: None,
            rounds_played: 0,
            event_log: Vec::new(),
            outcome: None,
        }
    }

    pub fn duelist(&self, side: Side) -> &Duelist {
        match side {
            Side::Human => &self.human,
            Side::Automated => &self.automated,
        }
    }

    pub fn duelist_mut(&mut self, side: Side) -> &mut Duelist {
        match side {
            Side::Human => &mut self.human,
            Side::Automated => &mut self.automated,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DuelStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        self.status == DuelStatus::Completed
    }

    pub fn record_event(&mut self, event: DuelEvent) {
        self.event_log.push(event);
    }

    pub fn score_event(&self) -> DuelEvent {
        DuelEvent::ScoreUpdated {
            human_victories: self.human.victories,
            automated_victories: self.automated.victories,
        }
    }

    pub fn termination_reached(&self) -> bool {
        [&self.human, &self.automated].iter().any(|duelist| {
            duelist.victories >= WINNING_SCORE || duelist.pool.is_empty() || duelist.is_defeated()
        })
    }

    /// 胜场严格领先的一方。
    pub fn leading_on_victories(&self) -> Option<Side> {
        match self.human.victories.cmp(&self.automated.victories) {
            std::cmp::Ordering::Greater => Some(Side::Human),
            std::cmp::Ordering::Less => Some(Side::Automated),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn statistics(&self) -> DuelStatistics {
        DuelStatistics {
            rounds_played: self.rounds_played,
            human_direct_strikes: self.human.direct_strikes,
            automated_direct_strikes: self.automated.direct_strikes,
        }
    }
}

impl Default for DuelState {
    fn default() -> Self {
        Self::new(DEFAULT_HUMAN_NAME, DEFAULT_AUTOMATED_NAME)
    }
}
