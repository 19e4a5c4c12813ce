use rand::seq::SliceRandom;
use rand::Rng;

use super::card::{Card, CardRecord};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("card catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("requested {requested} battle-ready cards but the catalog only has {available}")]
    NotEnoughCards { requested: usize, available: usize },
}

/// 离线卡牌目录：解析宿主提供的卡牌记录并发牌。
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
}

impl CardCatalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// 接受裸数组或 `{"data": [...]}` 两种格式。
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Payload {
            Bare(Vec<CardRecord>),
            Wrapped { data: Vec<CardRecord> },
        }

        let records = match serde_json::from_str::<Payload>(json)? {
            Payload::Bare(records) | Payload::Wrapped { data: records } => records,
        };
        Ok(Self::new(records.into_iter().map(Card::from).collect()))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn find(&self, name: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|card| card.name().eq_ignore_ascii_case(name))
    }

    pub fn battle_ready(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|card| card.is_battle_eligible())
    }

    /// 随机抽取不重复的可参战卡牌。
    pub fn deal<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Vec<Card>, CatalogError> {
        let eligible: Vec<&Card> = self.battle_ready().collect();
        if eligible.len() < count {
            return Err(CatalogError::NotEnoughCards {
                requested: count,
                available: eligible.len(),
            });
        }
        Ok(eligible
            .choose_multiple(rng, count)
            .map(|card| (*card).clone())
            .collect())
    }

    /// 发出两副各 `count` 张、互不重复的卡组。
    pub fn deal_pair<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<(Vec<Card>, Vec<Card>), CatalogError> {
        let total = count
            .checked_mul(2)
            .ok_or_else(|| CatalogError::NotEnoughCards {
                requested: count,
                available: self.battle_ready().count(),
            })?;
        let mut dealt = self.deal(rng, total)?;
        let second = dealt.split_off(count);
        Ok((dealt, second))
    }
}
