//! The client-facing coordinator for studies, trials and metrics.

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::storage::Key;
use crate::strategy::{StrategyRegistry, SuggestionStrategy};
use crate::study::Study;
use crate::trial::Trial;

mod analysis;
mod builder;
mod completion;
mod persistence;
mod suggest;

pub use builder::AdvisorBuilder;
pub use persistence::RegistrySnapshot;

/// Algorithm assigned by [`Advisor::create_study_with_default`] unless the
/// builder overrides it.
pub const DEFAULT_ALGORITHM: &str = "BayesianOptimization";

/// Coordinates studies, trial suggestions and trial completion.
///
/// The advisor owns a [`Registry`] behind a read-write lock and a
/// [`StrategyRegistry`] mapping algorithm names to strategies. Every method
/// takes `&self` and runs to completion; records are returned as clones.
///
/// # Examples
///
/// ```
/// use advisor::strategy::TrialProposal;
/// use advisor::{Advisor, Result, Study, Trial};
/// use serde_json::json;
///
/// let advisor = Advisor::new();
/// advisor
///     .register_strategy("Stub", || {
///         |study: &Study, _: &[Trial], _: usize| -> Result<Vec<TrialProposal>> {
///             Ok(vec![TrialProposal::new(study.name(), "t1")])
///         }
///     })
///     .unwrap();
///
/// advisor
///     .create_study("s1", &json!({"goal": "MAXIMIZE", "params": []}), "Stub")
///     .unwrap();
/// let trials = advisor.create_suggested_trials("s1", 1).unwrap();
/// advisor.complete_trial_with_one_metric(trials[0].id(), 4.2).unwrap();
///
/// assert!(advisor.is_study_done("s1").unwrap());
/// let best = advisor.get_best_trial("s1").unwrap().unwrap();
/// assert_eq!(best.name(), "t1");
/// assert_eq!(best.objective_value(), Some(4.2));
/// ```
pub struct Advisor {
    pub(crate) registry: RwLock<Registry>,
    pub(crate) strategies: RwLock<StrategyRegistry>,
    pub(crate) default_algorithm: String,
}

impl Advisor {
    /// Creates an advisor with empty tables and no registered strategies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            strategies: RwLock::new(StrategyRegistry::new()),
            default_algorithm: DEFAULT_ALGORITHM.to_owned(),
        }
    }

    /// Returns an [`AdvisorBuilder`] for configuring strategies, the default
    /// algorithm and initial tables.
    #[must_use]
    pub fn builder() -> AdvisorBuilder {
        AdvisorBuilder::new()
    }

    /// The algorithm used by [`create_study_with_default`](Self::create_study_with_default).
    #[must_use]
    pub fn default_algorithm(&self) -> &str {
        &self.default_algorithm
    }

    /// Registers a strategy factory and records an algorithm descriptor for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if `name` is already registered.
    pub fn register_strategy<F, S>(&self, name: &str, factory: F) -> Result<Algorithm>
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: SuggestionStrategy + 'static,
    {
        self.register_with(name, |strategies| {
            strategies.register(name, factory);
        })
    }

    /// Registers one shared strategy instance and records an algorithm
    /// descriptor for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if `name` is already registered.
    pub fn register_strategy_instance(
        &self,
        name: &str,
        strategy: impl SuggestionStrategy + 'static,
    ) -> Result<Algorithm> {
        self.register_with(name, |strategies| {
            strategies.register_instance(name, strategy);
        })
    }

    fn register_with(
        &self,
        name: &str,
        insert: impl FnOnce(&mut StrategyRegistry),
    ) -> Result<Algorithm> {
        let mut registry = self.registry.write();
        let mut strategies = self.strategies.write();
        if strategies.contains(name) {
            return Err(Error::DuplicateName {
                kind: "algorithm",
                name: name.to_owned(),
            });
        }
        let algorithm = if registry.algorithms().exists(name) {
            registry.algorithms().get_by_name(name)?.clone()
        } else {
            registry.create_algorithm(name)?.clone()
        };
        insert(&mut strategies);
        trace_info!(algorithm = name, "strategy registered");
        Ok(algorithm)
    }

    /// Names of all registered strategies, sorted.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies
            .read()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// All algorithm descriptors, in id order.
    #[must_use]
    pub fn list_algorithms(&self) -> Vec<Algorithm> {
        self.registry.read().algorithms().list().cloned().collect()
    }

    /// Creates a study.
    ///
    /// `configuration` is any serializable JSON object; it should carry a
    /// `goal` of `MAXIMIZE` or `MINIMIZE` and the parameter definitions (see
    /// [`StudyConfiguration`](crate::config::StudyConfiguration)).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if the name is taken and
    /// [`Error::InvalidConfiguration`] if the configuration is not an object.
    pub fn create_study(
        &self,
        name: &str,
        configuration: &impl Serialize,
        algorithm: &str,
    ) -> Result<Study> {
        self.registry
            .write()
            .create_study(name, configuration, algorithm)
            .cloned()
    }

    /// Creates a study that uses the advisor's default algorithm.
    ///
    /// # Errors
    ///
    /// Same as [`create_study`](Self::create_study).
    pub fn create_study_with_default(
        &self,
        name: &str,
        configuration: &impl Serialize,
    ) -> Result<Study> {
        self.create_study(name, configuration, &self.default_algorithm)
    }

    /// Fetches a study by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no study has this name.
    pub fn get_study_by_name(&self, name: &str) -> Result<Study> {
        self.registry.read().studies().get_by_name(name).cloned()
    }

    /// Returns the study named `name`, creating it if absent.
    ///
    /// Matching is by name only: an existing study is returned unchanged even
    /// if `configuration` or `algorithm` differ from what it was created with.
    ///
    /// # Errors
    ///
    /// Same as [`create_study`](Self::create_study) when the study is created.
    pub fn get_or_create_study(
        &self,
        name: &str,
        configuration: &impl Serialize,
        algorithm: &str,
    ) -> Result<Study> {
        let mut registry = self.registry.write();
        if registry.studies().exists(name) {
            return registry.studies().get_by_name(name).cloned();
        }
        registry
            .create_study(name, configuration, algorithm)
            .cloned()
    }

    /// All studies, in id order.
    #[must_use]
    pub fn list_studies(&self) -> Vec<Study> {
        self.registry.read().studies().list().cloned().collect()
    }

    /// All trials of a study, in id order. Unknown studies have no trials.
    #[must_use]
    pub fn list_trials(&self, study_name: &str) -> Vec<Trial> {
        self.registry
            .read()
            .trials_of(study_name)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Creates a pending trial in an existing study.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudyNotFound`] if the study does not exist and
    /// [`Error::DuplicateName`] if the trial name is taken.
    pub fn create_trial(&self, study_name: &str, name: &str) -> Result<Trial> {
        self.registry
            .write()
            .create_trial(study_name, name)
            .cloned()
    }

    /// Fetches a trial by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no trial has this id.
    pub fn get_trial(&self, trial_id: u64) -> Result<Trial> {
        self.registry.read().trials().get(Key::Id(trial_id)).cloned()
    }

    /// Fetches a trial by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no trial has this name.
    pub fn get_trial_by_name(&self, name: &str) -> Result<Trial> {
        self.registry.read().trials().get(Key::Name(name)).cloned()
    }

    /// A copy of the current tables.
    #[must_use]
    pub fn registry(&self) -> Registry {
        self.registry.read().clone()
    }

    pub(crate) fn strategy_for(&self, algorithm: &str) -> Result<Arc<dyn SuggestionStrategy>> {
        self.strategies.read().resolve(algorithm)
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("Advisor")
            .field("studies", &registry.studies().len())
            .field("trials", &registry.trials().len())
            .field("trial_metrics", &registry.trial_metrics().len())
            .field("strategies", &*self.strategies.read())
            .field("default_algorithm", &self.default_algorithm)
            .finish()
    }
}
