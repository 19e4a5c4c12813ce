use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    card::{Card, CardId},
    choice::TacticalChoice,
    state::{
        DuelEvent, DuelOutcome, DuelState, DuelStatus, RoundOutcome, Side, StatusPhase,
        MIN_DECK_SIZE,
    },
};
use crate::ai::OpponentPolicy;
use crate::config::DuelConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "type")]
pub enum DuelError {
    #[error("both duelists need at least {required} cards to start; the {side} deck has {actual}")]
    InsufficientDeck {
        side: Side,
        required: usize,
        actual: usize,
    },
    #[error("there is no active duel")]
    NoActiveDuel,
    #[error("the tactical choice is not valid: {reason}")]
    InvalidChoice { reason: String },
    #[error("card {card_id} is not available to the {side} side")]
    CardUnavailable { side: Side, card_id: CardId },
    #[error("there are no pending selections to resolve")]
    NoPendingSelections { missing: Vec<Side> },
    #[error("the automated side has no cards left")]
    OpponentPoolExhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelResolution {
    pub state: DuelState,
    pub events: Vec<DuelEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DuelOutcome>,
}

impl DuelResolution {
    pub fn new(state: DuelState, events: Vec<DuelEvent>) -> Self {
        let outcome = state.outcome;
        Self {
            state,
            events,
            outcome,
        }
    }
}

/// 对决状态机：所有转换都先校验再修改状态，失败时状态保持不变。
#[derive(Debug, Clone)]
pub struct DuelEngine {
    rng: SmallRng,
    policy: OpponentPolicy,
}

impl DuelEngine {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            policy: OpponentPolicy::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            policy: OpponentPolicy::with_seed(seed.wrapping_add(1)),
        }
    }

    pub fn from_config(config: &DuelConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn push(state: &mut DuelState, events: &mut Vec<DuelEvent>, event: DuelEvent) {
        state.record_event(event.clone());
        events.push(event);
    }

    fn ensure_active(state: &DuelState) -> Result<(), DuelError> {
        if !state.is_active() {
            return Err(DuelError::NoActiveDuel);
        }
        Ok(())
    }

    fn ensure_deck_size(side: Side, deck: &[Card]) -> Result<(), DuelError> {
        if deck.len() < MIN_DECK_SIZE {
            return Err(DuelError::InsufficientDeck {
                side,
                required: MIN_DECK_SIZE,
                actual: deck.len(),
            });
        }
        Ok(())
    }

    fn invalid_reason(choice: &TacticalChoice) -> String {
        match (&choice.card, choice.stance) {
            (None, _) => "no card was selected".into(),
            (Some(card), _) if !card.is_battle_eligible() => {
                format!("{} cannot be sent into battle", card.name())
            }
            (_, None) => "no stance was selected".into(),
            _ => "unknown".into(),
        }
    }

    /// 开始（或重新开始）对决，进行中的对决会被放弃。
    pub fn commence(
        &mut self,
        state: &mut DuelState,
        human_deck: Vec<Card>,
        automated_deck: Vec<Card>,
    ) -> Result<Vec<DuelEvent>, DuelError> {
        Self::ensure_deck_size(Side::Human, &human_deck)?;
        Self::ensure_deck_size(Side::Automated, &automated_deck)?;

        state.human.reset_with_deck(human_deck);
        state.automated.reset_with_deck(automated_deck);
        state.human.pool.shuffle(&mut self.rng);
        state.automated.pool.shuffle(&mut self.rng);
        state.rounds_played = 0;
        state.event_log.clear();
        state.outcome = None;

        let leader = if self.rng.gen_bool(0.5) {
            Side::Human
        } else {
            Side::Automated
        };
        state.leader = Some(leader);
        state.status = DuelStatus::Active;

        tracing::info!(
            leader = %leader,
            human_cards = state.human.pool.len(),
            automated_cards = state.automated.pool.len(),
            "duel commenced"
        );

        let mut events = Vec::new();
        let score = state.score_event();
        Self::push(state, &mut events, score);
        Self::push(state, &mut events, DuelEvent::DuelStarted { leader });
        let initiator = state.duelist(leader).name.clone();
        Self::push(
            state,
            &mut events,
            DuelEvent::phase(
                StatusPhase::Starting,
                format!("The duel has begun. {initiator} makes the first move."),
            ),
        );

        if leader == Side::Automated {
            self.automated_lead(state, &mut events);
        }

        Ok(events)
    }

    pub fn submit_choice(
        &mut self,
        state: &mut DuelState,
        side: Side,
        choice: Option<TacticalChoice>,
    ) -> Result<Vec<DuelEvent>, DuelError> {
        Self::ensure_active(state)?;

        let mut choice = choice.ok_or_else(|| DuelError::InvalidChoice {
            reason: "no choice was supplied".into(),
        })?;
        if !choice.is_valid() {
            return Err(DuelError::InvalidChoice {
                reason: Self::invalid_reason(&choice),
            });
        }
        let Some(card_id) = choice.card.as_ref().map(Card::id) else {
            return Err(DuelError::InvalidChoice {
                reason: Self::invalid_reason(&choice),
            });
        };

        let duelist = state.duelist(side);
        let pooled = duelist
            .find_in_pool_index(card_id)
            .map(|idx| duelist.pool[idx].clone())
            .ok_or(DuelError::CardUnavailable { side, card_id })?;

        // 战斗数值一律取自卡池副本，而非提交的记录。
        choice.card = Some(pooled);
        tracing::debug!(side = %side, card_id, stance = ?choice.stance, "choice accepted");
        state.duelist_mut(side).pending = Some(choice);

        let mut events = Vec::new();
        if side == Side::Human && state.leader == Some(Side::Human) {
            self.automated_response(state, &mut events);
        }
        Ok(events)
    }

    pub fn resolve_round(&mut self, state: &mut DuelState) -> Result<Vec<DuelEvent>, DuelError> {
        if !state.is_active() {
            return Ok(Vec::new());
        }

        let (Some(human_choice), Some(automated_choice)) =
            (state.human.pending.clone(), state.automated.pending.clone())
        else {
            let missing = [Side::Human, Side::Automated]
                .into_iter()
                .filter(|side| state.duelist(*side).pending.is_none())
                .collect();
            return Err(DuelError::NoPendingSelections { missing });
        };

        let mut events = Vec::new();

        let human_power = human_choice.effective_power();
        let automated_power = automated_choice.effective_power();
        Self::push(
            state,
            &mut events,
            DuelEvent::BattleStatistics {
                human_power,
                automated_power,
                difference: i64::from(human_power) - i64::from(automated_power),
            },
        );

        let outcome = if human_choice.defeats(&automated_choice) {
            RoundOutcome::Won {
                winner: Side::Human,
            }
        } else if automated_choice.defeats(&human_choice) {
            RoundOutcome::Won {
                winner: Side::Automated,
            }
        } else {
            RoundOutcome::Tie
        };

        if let Some(winner) = outcome.winner() {
            state.duelist_mut(winner).record_round_win();
            state.duelist_mut(winner.opponent()).lose_life();
        }

        let removed_human: Vec<Card> = human_choice
            .card
            .as_ref()
            .and_then(|card| state.human.remove_from_pool(card.id()))
            .into_iter()
            .collect();
        let removed_automated: Vec<Card> = automated_choice
            .card
            .as_ref()
            .and_then(|card| state.automated.remove_from_pool(card.id()))
            .into_iter()
            .collect();

        let leader = state.leader.unwrap_or(Side::Human);
        tracing::debug!(
            round = state.rounds_played + 1,
            human_power,
            automated_power,
            outcome = ?outcome,
            "round resolved"
        );

        Self::push(
            state,
            &mut events,
            DuelEvent::RoundResolved {
                human: human_choice,
                automated: automated_choice,
                leader,
                outcome,
            },
        );
        Self::push(
            state,
            &mut events,
            DuelEvent::CardsRemoved {
                human: removed_human,
                automated: removed_automated,
            },
        );
        let score = state.score_event();
        Self::push(state, &mut events, score);

        state.human.pending = None;
        state.automated.pending = None;
        state.rounds_played += 1;

        if state.termination_reached() {
            Self::finalize(state, &mut events);
            return Ok(events);
        }

        let next = leader.opponent();
        state.leader = Some(next);
        if next == Side::Automated {
            self.automated_lead(state, &mut events);
        } else {
            Self::push(
                state,
                &mut events,
                DuelEvent::phase(
                    StatusPhase::HumanTurn,
                    "Your turn. Choose a card and a stance.",
                ),
            );
        }

        Ok(events)
    }

    fn automated_lead(&mut self, state: &mut DuelState, events: &mut Vec<DuelEvent>) {
        let Some(card) = self.policy.select_card(&state.automated.pool) else {
            Self::abort_exhausted(state, events);
            return;
        };
        let stance = self.policy.lead_stance();
        let choice = TacticalChoice::new(card, stance, state.automated.name.clone());
        tracing::debug!(card_id = ?choice.card.as_ref().map(Card::id), stance = ?stance, "automated side leads");

        state.automated.pending = Some(choice.clone());
        Self::push(state, events, DuelEvent::AutomatedSelected { choice });
        Self::push(
            state,
            events,
            DuelEvent::phase(
                StatusPhase::AwaitingHuman,
                "The automated side has chosen its card. Your move.",
            ),
        );
    }

    fn automated_response(&mut self, state: &mut DuelState, events: &mut Vec<DuelEvent>) {
        let Some(card) = self.policy.select_card(&state.automated.pool) else {
            Self::abort_exhausted(state, events);
            return;
        };
        let opposing = state.human.pending.as_ref().and_then(|choice| choice.stance);
        let stance = self.policy.counter_stance(opposing);
        let choice = TacticalChoice::new(card, stance, state.automated.name.clone());
        tracing::debug!(card_id = ?choice.card.as_ref().map(Card::id), stance = ?stance, opposing = ?opposing, "automated side responds");

        state.automated.pending = Some(choice);
        Self::push(
            state,
            events,
            DuelEvent::phase(
                StatusPhase::Resolving,
                "Both sides have chosen. Resolving combat...",
            ),
        );
    }

    /// 自动方卡池为空时直接结束对决。
    fn abort_exhausted(state: &mut DuelState, events: &mut Vec<DuelEvent>) {
        tracing::warn!(round = state.rounds_played, "automated pool exhausted");
        Self::push(
            state,
            events,
            DuelEvent::error(DuelError::OpponentPoolExhausted),
        );
        state.human.pending = None;
        state.automated.pending = None;
        Self::finalize(state, events);
    }

    fn finalize(state: &mut DuelState, events: &mut Vec<DuelEvent>) {
        state.status = DuelStatus::Completed;
        let winner = state.leading_on_victories();
        state.outcome = Some(DuelOutcome {
            winner,
            rounds_played: state.rounds_played,
        });
        tracing::info!(
            winner = ?winner,
            rounds = state.rounds_played,
            stats = %state.statistics(),
            "duel completed"
        );

        Self::push(state, events, DuelEvent::DuelCompleted { winner });
        let rounds = state.rounds_played;
        Self::push(
            state,
            events,
            DuelEvent::phase(
                StatusPhase::Finished,
                format!("Duel completed. Rounds played: {rounds}"),
            ),
        );
    }
}

impl Default for DuelEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{INITIAL_LIVES, WINNING_SCORE};
    use crate::game::Stance;

    fn creature(id: u32, attack: i32, defense: i32) -> Card {
        Card::new(id, format!("Creature {id}"), "Monster", attack, defense)
    }

    fn deck(offset: u32, size: u32) -> Vec<Card> {
        (0..size)
            .map(|i| creature(offset + i, 1000 + 150 * i as i32, 900 + 120 * i as i32))
            .collect()
    }

    fn started(seed: u64) -> (DuelEngine, DuelState) {
        let mut engine = DuelEngine::with_seed(seed);
        let mut state = DuelState::default();
        engine
            .commence(&mut state, deck(1, 5), deck(100, 5))
            .expect("commence should succeed");
        (engine, state)
    }

    /// 无论哪方先手，都提交人类方卡池中的第一张卡。
    fn play_round(engine: &mut DuelEngine, state: &mut DuelState) -> Vec<DuelEvent> {
        let card = state.human.pool[0].clone();
        let choice = TacticalChoice::new(card, Stance::Offensive, "Tester");
        engine
            .submit_choice(state, Side::Human, Some(choice))
            .expect("submit should succeed");
        assert!(state.human.pending.is_some());
        assert!(state.automated.pending.is_some());
        engine.resolve_round(state).expect("resolve should succeed")
    }

    #[test]
    fn commence_seeds_a_fresh_duel() {
        for seed in 0..16 {
            let (_, state) = started(seed);
            assert_eq!(state.status, DuelStatus::Active);
            assert_eq!(state.human.lives, INITIAL_LIVES);
            assert_eq!(state.automated.lives, INITIAL_LIVES);
            assert_eq!(state.human.victories, 0);
            assert_eq!(state.automated.victories, 0);
            assert!(state.leader.is_some());
            assert_eq!(state.human.pool.len(), 5);
            assert_eq!(state.automated.pool.len(), 5);
            match state.leader {
                Some(Side::Automated) => assert!(state.automated.pending.is_some()),
                _ => assert!(state.automated.pending.is_none()),
            }
        }
    }

    #[test]
    fn commence_emits_score_then_start() {
        let mut engine = DuelEngine::with_seed(3);
        let mut state = DuelState::default();
        let events = engine
            .commence(&mut state, deck(1, 3), deck(100, 3))
            .expect("commence should succeed");
        assert!(matches!(
            events[0],
            DuelEvent::ScoreUpdated {
                human_victories: 0,
                automated_victories: 0
            }
        ));
        assert!(matches!(events[1], DuelEvent::DuelStarted { .. }));
        assert!(matches!(
            events[2],
            DuelEvent::PhaseChanged {
                phase: StatusPhase::Starting,
                ..
            }
        ));
        if state.leader == Some(Side::Automated) {
            assert!(events
                .iter()
                .any(|event| matches!(event, DuelEvent::AutomatedSelected { .. })));
        }
        assert_eq!(state.event_log, events);
    }

    #[test]
    fn short_deck_is_rejected_and_engine_stays_idle() {
        let mut engine = DuelEngine::with_seed(1);
        let mut state = DuelState::default();
        let err = engine
            .commence(&mut state, deck(1, 2), deck(100, 5))
            .expect_err("two cards are not enough");
        assert_eq!(
            err,
            DuelError::InsufficientDeck {
                side: Side::Human,
                required: 3,
                actual: 2
            }
        );
        assert_eq!(state, DuelState::default());

        let err = engine
            .commence(&mut state, deck(1, 5), deck(100, 2))
            .expect_err("two cards are not enough");
        assert!(matches!(
            err,
            DuelError::InsufficientDeck {
                side: Side::Automated,
                ..
            }
        ));
        assert_eq!(state.status, DuelStatus::Idle);
        assert!(state.leader.is_none());
        assert!(state.human.pool.is_empty() && state.automated.pool.is_empty());
    }

    #[test]
    fn offensive_beats_weaker_defensive() {
        let x = creature(1, 2500, 2000);
        let y = creature(100, 1800, 2400);
        let mut engine = DuelEngine::with_seed(5);
        let mut state = DuelState::default();
        engine
            .commence(
                &mut state,
                vec![x.clone(), creature(2, 100, 100), creature(3, 100, 100)],
                vec![y.clone(), creature(101, 100, 100), creature(102, 100, 100)],
            )
            .expect("commence should succeed");

        state.human.pending = Some(TacticalChoice::anonymous(x, Stance::Offensive));
        state.automated.pending = Some(TacticalChoice::anonymous(y, Stance::Defensive));
        let events = engine.resolve_round(&mut state).expect("resolve should succeed");

        assert!(events.iter().any(|event| matches!(
            event,
            DuelEvent::BattleStatistics {
                human_power: 2500,
                automated_power: 2400,
                difference: 100
            }
        )));
        assert!(events.iter().any(|event| matches!(
            event,
            DuelEvent::RoundResolved {
                outcome: RoundOutcome::Won {
                    winner: Side::Human
                },
                ..
            }
        )));
        assert_eq!(state.automated.lives, 2);
        assert_eq!(state.human.lives, 3);
        assert_eq!(state.human.victories, 1);
        assert_eq!(state.automated.victories, 0);
        assert_eq!(state.human.direct_strikes, 1);
    }

    #[test]
    fn equal_power_goes_to_higher_level() {
        let veteran = creature(1, 1500, 3000);
        let rookie = creature(100, 1500, 0);
        let mut engine = DuelEngine::with_seed(8);
        let mut state = DuelState::default();
        engine
            .commence(
                &mut state,
                vec![rookie.clone(), creature(2, 1, 1), creature(3, 1, 1)],
                vec![veteran.clone(), creature(101, 1, 1), creature(102, 1, 1)],
            )
            .expect("commence should succeed");

        state.human.pending = Some(TacticalChoice::anonymous(rookie, Stance::Offensive));
        state.automated.pending = Some(TacticalChoice::anonymous(veteran, Stance::Offensive));
        let events = engine.resolve_round(&mut state).expect("resolve should succeed");

        let outcome = events.iter().find_map(|event| match event {
            DuelEvent::RoundResolved { outcome, .. } => Some(*outcome),
            _ => None,
        });
        assert_eq!(
            outcome,
            Some(RoundOutcome::Won {
                winner: Side::Automated
            })
        );
        assert_eq!(state.human.lives, 2);
        assert_eq!(state.automated.victories, 1);
    }

    #[test]
    fn equal_power_and_level_is_a_drawn_round() {
        let left = creature(1, 1200, 800);
        let right = creature(100, 1200, 900);
        let mut engine = DuelEngine::with_seed(9);
        let mut state = DuelState::default();
        engine
            .commence(
                &mut state,
                vec![left.clone(), creature(2, 1, 1), creature(3, 1, 1)],
                vec![right.clone(), creature(101, 1, 1), creature(102, 1, 1)],
            )
            .expect("commence should succeed");

        state.human.pending = Some(TacticalChoice::anonymous(left, Stance::Offensive));
        state.automated.pending = Some(TacticalChoice::anonymous(right, Stance::Offensive));
        let events = engine.resolve_round(&mut state).expect("resolve should succeed");

        assert!(events.iter().any(|event| matches!(
            event,
            DuelEvent::RoundResolved {
                outcome: RoundOutcome::Tie,
                ..
            }
        )));
        assert_eq!(state.human.lives, INITIAL_LIVES);
        assert_eq!(state.automated.lives, INITIAL_LIVES);
        assert_eq!(state.human.victories + state.automated.victories, 0);
        assert!(!state.human.holds(1));
        assert!(!state.automated.holds(100));
    }

    #[test]
    fn every_round_removes_one_card_per_side() {
        for seed in 0..12 {
            let (mut engine, mut state) = started(seed);
            while state.is_active() {
                let human_before = state.human.pool.len();
                let automated_before = state.automated.pool.len();
                let events = play_round(&mut engine, &mut state);

                assert_eq!(state.human.pool.len(), human_before - 1);
                assert_eq!(state.automated.pool.len(), automated_before - 1);
                assert!(events.iter().any(|event| matches!(
                    event,
                    DuelEvent::CardsRemoved { human, automated }
                        if human.len() == 1 && automated.len() == 1
                )));
                if state.is_active() {
                    assert!(state.human.pending.is_none());
                    if state.leader == Some(Side::Human) {
                        assert!(state.automated.pending.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn duel_completes_within_pool_bound() {
        for seed in 0..24 {
            let (mut engine, mut state) = started(seed);
            let bound = state.human.pool.len().min(state.automated.pool.len()) as u32 + 1;
            while state.is_active() {
                play_round(&mut engine, &mut state);
                assert!(state.rounds_played <= bound);
            }
            assert_eq!(state.status, DuelStatus::Completed);
            let outcome = state.outcome.expect("completed duel has an outcome");
            assert_eq!(outcome.rounds_played, state.rounds_played);
            assert_eq!(outcome.winner, state.leading_on_victories());
            assert!(state.human.victories <= WINNING_SCORE);
            assert!(state.automated.victories <= WINNING_SCORE);
            assert!(state.human.pending.is_none() && state.automated.pending.is_none());
        }
    }

    #[test]
    fn leader_alternates_between_rounds() {
        let (mut engine, mut state) = started(21);
        let first = state.leader.expect("active duel has a leader");
        play_round(&mut engine, &mut state);
        if state.is_active() {
            assert_eq!(state.leader, Some(first.opponent()));
            match first.opponent() {
                Side::Automated => assert!(state.automated.pending.is_some()),
                Side::Human => assert!(matches!(
                    state.event_log.last(),
                    Some(DuelEvent::PhaseChanged {
                        phase: StatusPhase::HumanTurn,
                        ..
                    })
                )),
            }
        }
    }

    #[test]
    fn completed_duel_rejects_choices() {
        let (mut engine, mut state) = started(4);
        while state.is_active() {
            play_round(&mut engine, &mut state);
        }
        let card = state.human.deck[0].clone();
        let err = engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(card, Stance::Offensive)),
            )
            .expect_err("duel is over");
        assert_eq!(err, DuelError::NoActiveDuel);
        assert!(engine
            .resolve_round(&mut state)
            .expect("resolve is a no-op")
            .is_empty());
    }

    #[test]
    fn idle_engine_rejects_choices_and_ignores_resolve() {
        let mut engine = DuelEngine::with_seed(2);
        let mut state = DuelState::default();
        let err = engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(creature(1, 1, 1), Stance::Offensive)),
            )
            .expect_err("no duel yet");
        assert_eq!(err, DuelError::NoActiveDuel);
        assert!(engine
            .resolve_round(&mut state)
            .expect("resolve is a no-op")
            .is_empty());
        assert_eq!(state, DuelState::default());
    }

    #[test]
    fn invalid_and_unavailable_choices_leave_state_untouched() {
        let (mut engine, mut state) = started(6);
        let before = state.clone();

        let err = engine
            .submit_choice(&mut state, Side::Human, None)
            .expect_err("missing choice");
        assert!(matches!(err, DuelError::InvalidChoice { .. }));

        let spell = Card::new(1, "Creature 1", "Spell Card", 5000, 5000);
        let err = engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(spell, Stance::Offensive)),
            )
            .expect_err("spells cannot battle");
        assert!(matches!(err, DuelError::InvalidChoice { .. }));

        let mut stanceless = TacticalChoice::anonymous(state.human.pool[0].clone(), Stance::Tactical);
        stanceless.stance = None;
        let err = engine
            .submit_choice(&mut state, Side::Human, Some(stanceless))
            .expect_err("stance is required");
        assert!(matches!(err, DuelError::InvalidChoice { .. }));

        let foreign = state.automated.pool[0].clone();
        let foreign_id = foreign.id();
        let err = engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(foreign, Stance::Offensive)),
            )
            .expect_err("card belongs to the other side");
        assert_eq!(
            err,
            DuelError::CardUnavailable {
                side: Side::Human,
                card_id: foreign_id
            }
        );

        assert_eq!(state, before);
    }

    #[test]
    fn resolve_without_both_choices_is_rejected() {
        let (mut engine, mut state) = started(10);
        state.human.pending = None;
        state.automated.pending = None;
        let before = state.clone();
        let err = engine
            .resolve_round(&mut state)
            .expect_err("nothing to resolve");
        assert_eq!(
            err,
            DuelError::NoPendingSelections {
                missing: vec![Side::Human, Side::Automated]
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn submitted_stats_are_replaced_by_pool_copy() {
        let (mut engine, mut state) = started(12);
        let pooled = state.human.pool[0].clone();
        let forged = Card::new(pooled.id(), "Forged", "Monster", 99_999, 99_999);
        engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(forged, Stance::Offensive)),
            )
            .expect("card id is in the pool");
        let pending = state.human.pending.as_ref().expect("choice stored");
        assert_eq!(pending.effective_power(), pooled.attack());
    }

    #[test]
    fn reactive_response_counters_the_human_stance() {
        let mut human_led = 0;
        for seed in 0..200 {
            let (mut engine, mut state) = started(seed);
            if state.leader != Some(Side::Human) {
                continue;
            }
            human_led += 1;
            let card = state.human.pool[0].clone();
            let events = engine
                .submit_choice(
                    &mut state,
                    Side::Human,
                    Some(TacticalChoice::new(card, Stance::Defensive, "Tester")),
                )
                .expect("submit should succeed");

            let response = state
                .automated
                .pending
                .as_ref()
                .expect("human lead triggers a response");
            assert_ne!(response.stance, Some(Stance::Defensive), "seed {seed}");
            assert!(!events
                .iter()
                .any(|event| matches!(event, DuelEvent::AutomatedSelected { .. })));
            assert!(matches!(
                events.last(),
                Some(DuelEvent::PhaseChanged {
                    phase: StatusPhase::Resolving,
                    ..
                })
            ));
        }
        assert!(human_led > 0, "some seeds should let the human lead");
    }

    #[test]
    fn empty_automated_pool_terminates_the_duel() {
        let (mut engine, mut state) = started(13);
        state.automated.pool.clear();
        state.automated.pending = None;
        state.leader = Some(Side::Human);

        let card = state.human.pool[0].clone();
        let events = engine
            .submit_choice(
                &mut state,
                Side::Human,
                Some(TacticalChoice::anonymous(card, Stance::Defensive)),
            )
            .expect("human choice is valid");

        assert!(events.iter().any(|event| matches!(
            event,
            DuelEvent::Error {
                error: DuelError::OpponentPoolExhausted,
                ..
            }
        )));
        assert!(events
            .iter()
            .any(|event| matches!(event, DuelEvent::DuelCompleted { winner: None })));
        assert_eq!(state.status, DuelStatus::Completed);
        assert!(state.human.pending.is_none());
    }

    #[test]
    fn recommence_abandons_the_current_duel() {
        let (mut engine, mut state) = started(14);
        play_round(&mut engine, &mut state);
        let card = state.human.pool[0].clone();
        let _ = engine.submit_choice(
            &mut state,
            Side::Human,
            Some(TacticalChoice::anonymous(card, Stance::Offensive)),
        );

        engine
            .commence(&mut state, deck(1, 4), deck(100, 4))
            .expect("restart should succeed");
        assert_eq!(state.status, DuelStatus::Active);
        assert_eq!(state.rounds_played, 0);
        assert_eq!(state.human.pool.len(), 4);
        assert!(state.human.pending.is_none());
        assert_eq!(state.human.lives, INITIAL_LIVES);
        assert_eq!(state.human.victories + state.automated.victories, 0);
        assert!(matches!(
            state.event_log.first(),
            Some(DuelEvent::ScoreUpdated { .. })
        ));
    }

    #[test]
    fn seeded_engines_play_identical_duels() {
        let (mut first_engine, mut first) = started(77);
        let (mut second_engine, mut second) = started(77);
        while first.is_active() {
            play_round(&mut first_engine, &mut first);
            play_round(&mut second_engine, &mut second);
        }
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.human.pool, second.human.pool);
    }
}
