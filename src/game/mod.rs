//! 对决核心逻辑模块（卡牌、姿态、状态机）。

pub mod card;
pub mod catalog;
pub mod choice;
pub mod rules;
pub mod stance;
pub mod state;

pub use card::{level_for_total_power, sample_decks, Card, CardId, CardRecord, Rarity};
pub use catalog::{CardCatalog, CatalogError};
pub use choice::TacticalChoice;
pub use rules::{DuelEngine, DuelError, DuelResolution};
pub use stance::Stance;
pub use state::{
    DuelEvent, DuelOutcome, DuelState, DuelStatistics, DuelStatus, Duelist, RoundOutcome, Side,
    StatusPhase, INITIAL_LIVES, MIN_DECK_SIZE, WINNING_SCORE,
};
