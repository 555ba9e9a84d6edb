use std::path::Path;

use parking_lot::RwLock;

use crate::error::Result;
use crate::registry::Registry;
use crate::strategy::{StrategyRegistry, SuggestionStrategy};

use super::{Advisor, DEFAULT_ALGORITHM, RegistrySnapshot};

/// A builder for constructing an [`Advisor`] with a fluent API.
///
/// Created via [`Advisor::builder()`]. Collects strategies, the default
/// algorithm and optionally a pre-populated [`Registry`] before
/// constructing the advisor.
///
/// # Defaults
///
/// - Default algorithm: [`DEFAULT_ALGORITHM`]
/// - Strategies: none
/// - Tables: empty
///
/// # Examples
///
/// ```
/// use advisor::strategy::TrialProposal;
/// use advisor::{Advisor, Result, Study, Trial};
///
/// fn one_more(study: &Study, trials: &[Trial], _: usize) -> Result<Vec<TrialProposal>> {
///     Ok(vec![TrialProposal::new(study.name(), format!("t{}", trials.len()))])
/// }
///
/// let advisor = Advisor::builder()
///     .default_algorithm("Sequential")
///     .strategy_instance("Sequential", one_more)
///     .build()
///     .unwrap();
///
/// assert_eq!(advisor.default_algorithm(), "Sequential");
/// assert_eq!(advisor.list_algorithms()[0].name(), "Sequential");
/// ```
#[derive(Debug)]
pub struct AdvisorBuilder {
    registry: Option<Registry>,
    strategies: StrategyRegistry,
    default_algorithm: String,
}

impl AdvisorBuilder {
    /// Create a new builder with default settings.
    pub(super) fn new() -> Self {
        Self {
            registry: None,
            strategies: StrategyRegistry::new(),
            default_algorithm: DEFAULT_ALGORITHM.to_owned(),
        }
    }

    /// Set the algorithm assigned by
    /// [`Advisor::create_study_with_default`].
    #[must_use]
    pub fn default_algorithm(mut self, name: impl Into<String>) -> Self {
        self.default_algorithm = name.into();
        self
    }

    /// Register a strategy factory under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    #[must_use]
    pub fn strategy<F, S>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: SuggestionStrategy + 'static,
    {
        self.strategies.register(name, factory);
        self
    }

    /// Register one shared strategy instance under `name`.
    #[must_use]
    pub fn strategy_instance(
        mut self,
        name: &str,
        strategy: impl SuggestionStrategy + 'static,
    ) -> Self {
        self.strategies.register_instance(name, strategy);
        self
    }

    /// Replace the whole registration table.
    #[must_use]
    pub fn strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    /// Start from existing tables instead of empty ones.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Start from the tables of a snapshot file written by [`Advisor::save`].
    ///
    /// # Errors
    ///
    /// Returns a [`Storage`](crate::Error::Storage) error if the file cannot
    /// be read or parsed.
    pub fn load(self, path: impl AsRef<Path>) -> Result<Self> {
        let snapshot = RegistrySnapshot::read(path.as_ref())?;
        Ok(self.registry(snapshot.registry))
    }

    /// Build the [`Advisor`].
    ///
    /// Every registered strategy gets an algorithm descriptor unless the
    /// tables already hold one with its name.
    ///
    /// # Errors
    ///
    /// Propagates table errors from creating the descriptors.
    pub fn build(self) -> Result<Advisor> {
        let mut registry = self.registry.unwrap_or_default();
        for name in self.strategies.names() {
            if !registry.algorithms().exists(name) {
                registry.create_algorithm(name)?;
            }
        }
        trace_debug!(
            strategies = self.strategies.len(),
            studies = registry.studies().len(),
            "advisor built"
        );
        Ok(Advisor {
            registry: RwLock::new(registry),
            strategies: RwLock::new(self.strategies),
            default_algorithm: self.default_algorithm,
        })
    }
}

impl Default for AdvisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
