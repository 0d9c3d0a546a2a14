use crate::api::Device;
use crate::error::{Error, Result};
use crate::sponsor::Sponsor;

use {
    futures::future::BoxFuture,
    log::warn,
    std::{collections::HashMap, sync::Arc},
};

/// Builds a device from its driver-specific configuration keys.
pub type Factory =
    fn(serde_yaml::Mapping, Arc<dyn Sponsor>) -> BoxFuture<'static, Result<Arc<dyn Device>>>;

/// Charger drivers keyed by type name. Populated by the host at startup.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self::default();
        crate::charger::register_all(&mut registry);
        registry
    }

    pub fn add(&mut self, name: &str, factory: Factory) {
        if self.factories.insert(name.to_lowercase(), factory).is_some() {
            warn!("charger type {} registered twice, replacing", name);
        }
    }

    pub fn get(&self, name: &str) -> Result<Factory> {
        self.factories
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownDriver(name.to_string()))
    }

    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub async fn create(
        &self,
        name: &str,
        other: serde_yaml::Mapping,
        sponsor: Arc<dyn Sponsor>,
    ) -> Result<Arc<dyn Device>> {
        let factory = self.get(name)?;
        factory(other, sponsor).await
    }
}
