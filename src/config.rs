//! 宿主传入的对决配置。

use serde::{Deserialize, Serialize};

use crate::game::state::{DEFAULT_AUTOMATED_NAME, DEFAULT_HUMAN_NAME};

fn default_human_name() -> String {
    DEFAULT_HUMAN_NAME.into()
}

fn default_automated_name() -> String {
    DEFAULT_AUTOMATED_NAME.into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuelConfig {
    /// 洗牌、先手与自动方策略共用的随机种子，`None` 时使用系统熵。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_human_name")]
    pub human_name: String,
    #[serde(default = "default_automated_name")]
    pub automated_name: String,
}

impl DuelConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            seed: None,
            human_name: default_human_name(),
            automated_name: default_automated_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = DuelConfig::from_json("{}").expect("empty object is valid");
        assert_eq!(config, DuelConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            DuelConfig::from_json(r#"{"seed":42,"human_name":"Mika"}"#).expect("valid config");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.human_name, "Mika");
        assert_eq!(config.automated_name, DEFAULT_AUTOMATED_NAME);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DuelConfig::from_json(r#"{"seed":"soon"}"#).is_err());
    }
}
