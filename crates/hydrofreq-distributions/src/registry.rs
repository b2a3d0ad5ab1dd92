//! Name-keyed collection of distribution families
//!
//! The fitting engine iterates a registry and never names a family, so a new
//! distribution only needs a [`DistributionModel`] implementation and a
//! `register` call.

use crate::families::*;
use crate::traits::DistributionModel;
use hydrofreq_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared handle to a family
pub type SharedModel = Arc<dyn DistributionModel>;

/// Keys of the standard families, in registration order
pub const STANDARD_KEYS: [&str; 9] = [
    "gumbel",
    "genextreme",
    "genpareto",
    "expon",
    "lognorm",
    "logistic",
    "gamma",
    "pearson3",
    "frechet",
];

/// Ordered map from registry key to family
#[derive(Clone, Default)]
pub struct DistributionRegistry {
    models: BTreeMap<String, SharedModel>,
}

impl DistributionRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the nine standard families
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Gumbel)
            .register(GeneralizedExtremeValue)
            .register(GeneralizedPareto)
            .register(Exponential)
            .register(LogNormal)
            .register(Logistic)
            .register(Gamma)
            .register(PearsonIII)
            .register(Frechet);
        registry
    }

    /// Add a family, replacing any family with the same key
    pub fn register<M: DistributionModel + 'static>(&mut self, model: M) -> &mut Self {
        self.register_shared(Arc::new(model))
    }

    /// Add an already shared family
    pub fn register_shared(&mut self, model: SharedModel) -> &mut Self {
        self.models.insert(model.key().to_string(), model);
        self
    }

    /// Look up a family by key
    pub fn get(&self, key: &str) -> Result<SharedModel> {
        self.models
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnsupportedDistribution(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    /// Registered keys in map order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Registered families in key order
    pub fn iter(&self) -> impl Iterator<Item = &SharedModel> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for DistributionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = DistributionRegistry::standard();
        assert_eq!(registry.len(), STANDARD_KEYS.len());
        for key in STANDARD_KEYS {
            let model = registry.get(key).unwrap();
            assert_eq!(model.key(), key);
            assert!(model.parameter_count() == 2 || model.parameter_count() == 3);
        }
    }

    #[test]
    fn test_unknown_key() {
        let registry = DistributionRegistry::standard();
        match registry.get("weibull_min") {
            Err(Error::UnsupportedDistribution(name)) => assert_eq!(name, "weibull_min"),
            other => panic!("expected UnsupportedDistribution, got {:?}", other.map(|m| m.key())),
        }
    }

    #[test]
    fn test_register_replaces_same_key() {
        let mut registry = DistributionRegistry::empty();
        registry.register(Gumbel).register(Gumbel);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("gumbel"));
        assert_eq!(format!("{registry:?}"), "[\"gumbel\"]");
    }
}
