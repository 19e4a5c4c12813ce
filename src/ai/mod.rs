//! 自动方决策模块（选牌、选姿态）。

pub mod policy;

pub use policy::{
    card_from_samples, counter_stance_from_sample, lead_stance_from_sample, strongest_card,
    OpponentPolicy, BEST_CARD_PROBABILITY,
};
