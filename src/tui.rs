use std::time::Duration;

use anyhow::Result;

use crate::config::Config;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub auto_refresh: Option<Duration>,
}

impl TuiRunOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            auto_refresh: cfg.auto_refresh(),
        }
    }
}

pub async fn run(cfg: &Config) -> Result<()> {
    crate::tui_shell::run(cfg, TuiRunOptions::from_config(cfg)).await
}
