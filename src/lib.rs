pub mod ai;
pub mod config;
pub mod game;
pub mod session;
pub mod utils;

use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub use ai::{counter_stance_from_sample, lead_stance_from_sample, OpponentPolicy};
pub use config::DuelConfig;
pub use game::{
    sample_decks, Card, CardCatalog, CardId, CardRecord, CatalogError, DuelEngine, DuelError,
    DuelEvent, DuelOutcome, DuelResolution, DuelState, DuelStatistics, DuelStatus, Duelist, Rarity,
    RoundOutcome, Side, Stance, StatusPhase, TacticalChoice,
};
pub use session::DuelSession;
use utils::set_panic_hook;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    web_sys::console::log_1(&"duel arena core ready".into());
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_side(side: &str) -> Result<Side, JsValue> {
    Side::from_str(side).map_err(|_| JsValue::from_str(&format!("unknown side: {side}")))
}

fn parse_deck(json: &str) -> Result<Vec<Card>, JsValue> {
    serde_json::from_str(json).map_err(serde_to_js_error)
}

/// 浏览器宿主使用的对决句柄，所有结果以 JSON 形式返回。
#[wasm_bindgen]
pub struct DuelArena {
    session: DuelSession,
}

impl DuelArena {
    fn resolution_json(&self, events: Vec<DuelEvent>) -> Result<String, JsValue> {
        let resolution = DuelResolution::new(self.session.snapshot(), events);
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }
}

#[wasm_bindgen]
impl DuelArena {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<DuelArena, JsValue> {
        let config = match config_json {
            Some(json) => DuelConfig::from_json(&json).map_err(serde_to_js_error)?,
            None => DuelConfig::default(),
        };
        Ok(DuelArena {
            session: DuelSession::new(&config),
        })
    }

    pub fn commence_json(
        &self,
        human_deck_json: &str,
        automated_deck_json: &str,
    ) -> Result<String, JsValue> {
        let human_deck = parse_deck(human_deck_json)?;
        let automated_deck = parse_deck(automated_deck_json)?;
        let events = self.session.commence(human_deck, automated_deck);
        self.resolution_json(events)
    }

    pub fn commence_sample(&self) -> Result<String, JsValue> {
        let (human_deck, automated_deck) = sample_decks();
        let events = self.session.commence(human_deck, automated_deck);
        self.resolution_json(events)
    }

    /// `choice_json` 可以是 `null`，会作为无效选择上报。
    pub fn submit_choice_json(&self, side: &str, choice_json: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let choice: Option<TacticalChoice> =
            serde_json::from_str(choice_json).map_err(serde_to_js_error)?;
        let events = self.session.submit_choice(side, choice);
        self.resolution_json(events)
    }

    pub fn resolve_round_json(&self) -> Result<String, JsValue> {
        let events = self.session.resolve_round();
        self.resolution_json(events)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(serde_to_js_error)
    }

    pub fn statistics(&self) -> String {
        self.session.statistics().to_string()
    }
}

/// 返回两副示例卡组，方便前端调试或初始化。
#[wasm_bindgen(js_name = "sampleDecks")]
pub fn sample_decks_js() -> Result<JsValue, JsValue> {
    to_value(&sample_decks()).map_err(JsValue::from)
}

/// 从宿主提供的卡牌目录中随机发出两副互不重复的卡组。
#[wasm_bindgen(js_name = "dealDecks")]
pub fn deal_decks(catalog_json: &str, size: usize, seed: Option<u64>) -> Result<JsValue, JsValue> {
    let catalog = CardCatalog::from_json(catalog_json).map_err(serde_to_js_error)?;
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let decks = catalog
        .deal_pair(&mut rng, size)
        .map_err(serde_to_js_error)?;
    to_value(&decks).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "counterStance")]
pub fn counter_stance(opposing: Option<String>, sample: f64) -> Result<JsValue, JsValue> {
    let opposing = match opposing {
        Some(name) => Some(
            Stance::from_str(&name)
                .map_err(|_| JsValue::from_str(&format!("unknown stance: {name}")))?,
        ),
        None => None,
    };
    to_value(&counter_stance_from_sample(opposing, sample)).map_err(JsValue::from)
}
