use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::game::{Card, Stance};

/// 70% 的概率直接出总战力最高的卡，其余时候随机出牌。
pub const BEST_CARD_PROBABILITY: f64 = 0.7;

/// 主动出牌时的姿态累积区间：60/30/10。
const LEAD_BANDS: [(f64, Stance); 3] = [
    (0.6, Stance::Offensive),
    (0.9, Stance::Defensive),
    (1.0, Stance::Tactical),
];

const VS_OFFENSIVE: [(f64, Stance); 3] = [
    (0.5, Stance::Defensive),
    (0.8, Stance::Tactical),
    (1.0, Stance::Offensive),
];

const VS_DEFENSIVE: [(f64, Stance); 2] = [(0.7, Stance::Offensive), (1.0, Stance::Tactical)];

const VS_TACTICAL: [(f64, Stance); 3] = [
    (0.4, Stance::Offensive),
    (0.8, Stance::Defensive),
    (1.0, Stance::Tactical),
];

fn pick_band(bands: &[(f64, Stance)], sample: f64) -> Stance {
    bands
        .iter()
        .find(|(threshold, _)| sample < *threshold)
        .or_else(|| bands.last())
        .map(|(_, stance)| *stance)
        .unwrap_or(Stance::Defensive)
}

/// 用 `[0, 1)` 内的一次均匀采样决定主动姿态。
pub fn lead_stance_from_sample(sample: f64) -> Stance {
    pick_band(&LEAD_BANDS, sample)
}

/// 根据对方姿态选择应对姿态；对方没有姿态时退回 [`lead_stance_from_sample`]。
pub fn counter_stance_from_sample(opposing: Option<Stance>, sample: f64) -> Stance {
    match opposing {
        Some(Stance::Offensive) => pick_band(&VS_OFFENSIVE, sample),
        Some(Stance::Defensive) => pick_band(&VS_DEFENSIVE, sample),
        Some(Stance::Tactical) => pick_band(&VS_TACTICAL, sample),
        None => lead_stance_from_sample(sample),
    }
}

/// 卡池中第一张攻防总和最高的卡。
pub fn strongest_card(pool: &[Card]) -> Option<&Card> {
    pool.iter().fold(None, |best: Option<&Card>, card| match best {
        Some(current) if current.total_power() >= card.total_power() => Some(current),
        _ => Some(card),
    })
}

/// 由偏好采样和随机下标选牌，卡池为空时返回 `None`。
pub fn card_from_samples(pool: &[Card], bias_sample: f64, random_index: usize) -> Option<&Card> {
    if pool.is_empty() {
        return None;
    }
    if bias_sample < BEST_CARD_PROBABILITY {
        strongest_card(pool)
    } else {
        pool.get(random_index % pool.len())
    }
}

/// 自动方的出牌策略。
#[derive(Debug, Clone)]
pub struct OpponentPolicy {
    rng: SmallRng,
}

impl OpponentPolicy {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn select_card(&mut self, pool: &[Card]) -> Option<Card> {
        if pool.is_empty() {
            return None;
        }
        let bias_sample = self.rng.gen::<f64>();
        let random_index = self.rng.gen_range(0..pool.len());
        card_from_samples(pool, bias_sample, random_index).cloned()
    }

    pub fn lead_stance(&mut self) -> Stance {
        lead_stance_from_sample(self.rng.gen::<f64>())
    }

    pub fn counter_stance(&mut self, opposing: Option<Stance>) -> Stance {
        counter_stance_from_sample(opposing, self.rng.gen::<f64>())
    }
}

impl Default for OpponentPolicy {
    fn default() -> Self {
        Self::new()
    }
}
