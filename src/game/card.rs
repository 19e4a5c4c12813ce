use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// 全局唯一的卡牌标识。
pub type CardId = u32;

const CREATURE_KEYWORDS: [&str; 3] = ["monster", "creature", "beast"];
const LEVEL_BAND: u32 = 500;
const MAX_LEVEL: u32 = 10;

const DEFAULT_NAME: &str = "Mystery Card";
const DEFAULT_CATEGORY: &str = "Unknown";
const DEFAULT_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Basic,
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn from_total_power(total_power: u32) -> Self {
        match total_power {
            4000.. => Rarity::Legendary,
            3000.. => Rarity::Epic,
            2000.. => Rarity::Rare,
            1000.. => Rarity::Common,
            _ => Rarity::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Basic => "BASIC",
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 由总战力计算等级：每满 500 点加一级，最高 10 级。
pub fn level_for_total_power(total_power: u32) -> u8 {
    (total_power / LEVEL_BAND + 1).min(MAX_LEVEL) as u8
}

/// 卡牌来源提供的原始记录，稀有度与等级在转换为 [`Card`] 时重新计算。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    pub id: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "atk")]
    pub attack: i32,
    #[serde(default, alias = "def")]
    pub defense: i32,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub in_battle: bool,
}

/// 对战中使用的卡牌数据。战斗数值在构造后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CardRecord")]
pub struct Card {
    id: CardId,
    name: String,
    category: String,
    attack: u32,
    defense: u32,
    rarity: Rarity,
    level: u8,
    description: String,
    image_url: String,
    activated: bool,
    in_battle: bool,
}

impl Card {
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        category: impl Into<String>,
        attack: i32,
        defense: i32,
    ) -> Self {
        Self::from(CardRecord {
            id,
            name: Some(name.into()),
            category: Some(category.into()),
            attack,
            defense,
            ..CardRecord::default()
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn set_activated(&mut self, activated: bool) {
        self.activated = activated;
    }

    pub fn is_in_battle(&self) -> bool {
        self.in_battle
    }

    pub fn set_in_battle(&mut self, in_battle: bool) {
        self.in_battle = in_battle;
    }

    pub fn total_power(&self) -> u32 {
        self.attack + self.defense
    }

    /// 只有怪兽/生物/野兽类卡牌可以参战。
    pub fn is_battle_eligible(&self) -> bool {
        let category = self.category.to_lowercase();
        CREATURE_KEYWORDS
            .iter()
            .any(|keyword| category.contains(keyword))
    }

    /// 不考虑姿态的攻击力对防御力判定。
    pub fn can_defeat(&self, opponent: &Card) -> bool {
        self.is_battle_eligible()
            && opponent.is_battle_eligible()
            && self.attack > opponent.defense
    }

    pub fn compact_label(&self) -> String {
        format!("{} ({}/{})", self.name, self.attack, self.defense)
    }
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        let attack = record.attack.max(0) as u32;
        let defense = record.defense.max(0) as u32;
        let total_power = attack + defense;
        Self {
            id: record.id,
            name: record.name.unwrap_or_else(|| DEFAULT_NAME.into()),
            category: record.category.unwrap_or_else(|| DEFAULT_CATEGORY.into()),
            attack,
            defense,
            rarity: Rarity::from_total_power(total_power),
            level: level_for_total_power(total_power),
            description: record
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.into()),
            image_url: record.image_url.unwrap_or_default(),
            activated: record.activated,
            in_battle: record.in_battle,
        }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] - ATK:{}/DEF:{} (Level {}, {})",
            self.name, self.category, self.attack, self.defense, self.level, self.rarity
        )
    }
}

/// 返回两副示例卡组（人类方、自动方），方便前端调试或初始化。
pub fn sample_decks() -> (Vec<Card>, Vec<Card>) {
    let human = vec![
        Card::new(1, "Azure Wyrm", "Dragon Monster", 3000, 2500)
            .with_description("A storm-born dragon that never yields."),
        Card::new(2, "Iron Sentinel", "Machine Monster", 1800, 2400)
            .with_description("Holds the line while allies regroup."),
        Card::new(3, "Ember Fox", "Beast", 1400, 900),
        Card::new(4, "Grove Warden", "Plant Creature", 1200, 2100),
        Card::new(5, "Night Stalker", "Fiend Monster", 2200, 1300),
    ];

    let automated = vec![
        Card::new(101, "Obsidian Golem", "Rock Monster", 1900, 2800)
            .with_description("Slow, patient and nearly unbreakable."),
        Card::new(102, "Thunder Roc", "Winged Beast", 2500, 1600),
        Card::new(103, "Cinder Imp", "Fiend Monster", 1300, 700),
        Card::new(104, "Tidecaller Serpent", "Sea Serpent Creature", 2100, 2000),
        Card::new(105, "Silver Lynx", "Beast", 1700, 1200),
    ];

    (human, automated)
}
