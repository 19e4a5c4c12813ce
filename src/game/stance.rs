use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 出战姿态，决定卡牌的有效战力。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Offensive,
    Defensive,
    Tactical,
}

impl Stance {
    pub const ALL: [Stance; 3] = [Stance::Offensive, Stance::Defensive, Stance::Tactical];

    pub fn effective_power(&self, attack: u32, defense: u32) -> u32 {
        match self {
            Stance::Offensive => attack,
            Stance::Defensive => defense,
            Stance::Tactical => ((u64::from(attack) + u64::from(defense)) / 2) as u32,
        }
    }

    pub fn allows_direct_strike(&self) -> bool {
        !matches!(self, Stance::Defensive)
    }

    /// 未知下标一律视为防守姿态。
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Stance::Offensive,
            2 => Stance::Tactical,
            _ => Stance::Defensive,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stance::Offensive => "Offensive Stance",
            Stance::Defensive => "Defensive Stance",
            Stance::Tactical => "Tactical Stance",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Stance::Offensive => "⚔️",
            Stance::Defensive => "🛡️",
            Stance::Tactical => "⚖️",
        }
    }
}

impl FromStr for Stance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offensive" | "attack" => Ok(Stance::Offensive),
            "defensive" | "defense" => Ok(Stance::Defensive),
            "tactical" | "balanced" => Ok(Stance::Tactical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.display_name())
    }
}
