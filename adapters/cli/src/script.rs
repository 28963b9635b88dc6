//! Scripted player input loaded from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use node_defense_core::PlayerCommand;
use serde::Deserialize;

/// Ordered player commands fed to a session.
///
/// ```toml
/// commands = [
///     { build = { kind = "firewall", column = 4, row = 2 } },
///     "trade",
///     { talk = { faction = "darknet_commune" } },
///     { accept = { offer = 0 } },
///     "back",
///     "start",
/// ]
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Script {
    #[serde(default)]
    pub(crate) commands: Vec<PlayerCommand>,
}

impl Script {
    /// Starts every wave up to the final one without building anything.
    pub(crate) fn waves_only(final_wave: u32) -> Self {
        Self {
            commands: (0..final_wave).map(|_| PlayerCommand::Start).collect(),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        parse(&text).with_context(|| format!("failed to parse script {}", path.display()))
    }
}

fn parse(text: &str) -> Result<Script> {
    Ok(toml::from_str(text)?)
}
