use std::collections::BTreeMap;
use std::sync::Arc;

use super::SuggestionStrategy;
use crate::error::{Error, Result};

type Factory = Arc<dyn Fn() -> Arc<dyn SuggestionStrategy> + Send + Sync>;

/// Registration table mapping algorithm names to strategy factories.
///
/// Resolving a name runs its factory, so a strategy registered with
/// [`register`](Self::register) gets a fresh instance per suggestion
/// request, while one registered with
/// [`register_instance`](Self::register_instance) is shared.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, Factory>,
}

impl StrategyRegistry {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`, replacing any previous entry.
    ///
    /// Returns `true` if the name was not registered before.
    pub fn register<F, S>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: SuggestionStrategy + 'static,
    {
        let factory: Factory = Arc::new(move || Arc::new(factory()) as Arc<dyn SuggestionStrategy>);
        self.factories.insert(name.into(), factory).is_none()
    }

    /// Registers one shared strategy instance under `name`.
    ///
    /// Returns `true` if the name was not registered before.
    pub fn register_instance(
        &mut self,
        name: impl Into<String>,
        strategy: impl SuggestionStrategy + 'static,
    ) -> bool {
        let shared: Arc<dyn SuggestionStrategy> = Arc::new(strategy);
        let factory: Factory = Arc::new(move || Arc::clone(&shared));
        self.factories.insert(name.into(), factory).is_none()
    }

    /// Resolves an algorithm name to a strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAlgorithm`] if nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn SuggestionStrategy>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_owned()))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl core::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
