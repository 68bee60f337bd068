//! 板级配置文件（JSON）

use std::fs;
use std::io;
use std::path::Path;

use pwm_buzzer_common::{BuzzerConfig, BuzzerResult, DEV_NAME};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// /sys/class/pwm/pwmchipN
    pub pwm_chip: u32,
    pub pwm_channel: u32,
    pub node_name: String,
    pub restore_on_resume: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            pwm_chip: 0,
            pwm_channel: 0,
            node_name: DEV_NAME.to_string(),
            restore_on_resume: false,
        }
    }
}

impl BoardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn buzzer_config(&self) -> BuzzerResult<BuzzerConfig> {
        Ok(BuzzerConfig::default()
            .with_node_name(&self.node_name)?
            .with_restore_on_resume(self.restore_on_resume))
    }
}
