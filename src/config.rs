use crate::prelude::*;

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub chargers: Vec<Charger>,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    pub sponsortoken: Option<String>,
}

// Charger {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Charger {
    pub name: String,
    #[serde(rename = "type")]
    pub charger_type: String,
    #[serde(default = "Config::default_enabled")]
    pub enabled: bool,

    /// Driver-specific keys, handed to the registry factory untouched.
    #[serde(flatten)]
    pub other: serde_yaml::Mapping,
}
impl Charger {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn charger_type(&self) -> &str {
        &self.charger_type
    }

    pub fn other(&self) -> serde_yaml::Mapping {
        self.other.clone()
    }
} // }}}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        Self::from_yaml(&content)
    }

    pub fn log_summary(&self) {
        let config = self;
        info!("Configuration loaded successfully:");
        info!(
            "  Chargers: {} configured, {} enabled",
            config.chargers.len(),
            config.enabled_chargers().count()
        );
        for (i, charger) in config.chargers.iter().enumerate() {
            info!("    Charger[{}]:", i);
            info!("      Name: {}", charger.name);
            info!("      Type: {}", charger.charger_type);
            info!("      Enabled: {}", charger.enabled);
        }
        info!(
            "  Sponsor Token: {}",
            if config.sponsortoken.is_some() { "set" } else { "not set" }
        );
        info!("  Log Level: {}", config.loglevel);
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chargers.is_empty() {
            bail!("at least one charger must be configured");
        }

        let mut names = HashSet::new();
        for (i, charger) in self.chargers.iter().enumerate() {
            if charger.name.trim().is_empty() {
                bail!("chargers[{}].name cannot be empty", i);
            }
            if charger.charger_type.trim().is_empty() {
                bail!("chargers[{}].type cannot be empty", i);
            }
            if !names.insert(charger.name.as_str()) {
                bail!("duplicate charger name: {}", charger.name);
            }
        }

        Ok(())
    }

    pub fn enabled_chargers(&self) -> impl Iterator<Item = &Charger> {
        self.chargers.iter().filter(|c| c.enabled())
    }

    /// The named charger, or the first enabled one when no name is given.
    pub fn charger(&self, name: Option<&str>) -> Result<&Charger> {
        match name {
            Some(name) => self
                .enabled_chargers()
                .find(|c| c.name() == name)
                .ok_or_else(|| anyhow!("no enabled charger named {}", name)),
            None => self
                .enabled_chargers()
                .next()
                .ok_or_else(|| anyhow!("no enabled charger configured")),
        }
    }

    pub fn sponsor(&self) -> SponsorToken {
        SponsorToken::new(self.sponsortoken.clone())
    }

    pub fn loglevel(&self) -> &str {
        &self.loglevel
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_enabled() -> bool {
        true
    }
}
