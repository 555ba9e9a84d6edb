//! The suggestion-strategy contract and its registration table.
//!
//! Search algorithms (random search, grid search, Bayesian optimization,
//! TPE, CMA-ES, ...) live outside this crate. Each plugs in by implementing
//! [`SuggestionStrategy`] and being registered under the algorithm name that
//! studies refer to.
//!
//! Closures with the right signature are strategies too:
//!
//! ```
//! use advisor::strategy::{StrategyRegistry, SuggestionStrategy, TrialProposal};
//! use advisor::{Result, Study, Trial};
//!
//! let mut strategies = StrategyRegistry::new();
//! strategies.register_instance(
//!     "Sequential",
//!     |study: &Study, trials: &[Trial], count: usize| -> Result<Vec<TrialProposal>> {
//!         Ok((trials.len()..trials.len() + count)
//!             .map(|i| TrialProposal::new(study.name(), format!("{}-{i}", study.name())))
//!             .collect())
//!     },
//! );
//! assert!(strategies.contains("Sequential"));
//! ```

mod registry;

use serde::{Deserialize, Serialize};

pub use registry::StrategyRegistry;

use crate::error::Result;
use crate::param::{ParamValue, ParameterValues};
use crate::study::Study;
use crate::trial::Trial;

/// A new trial proposed by a strategy, not yet persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialProposal {
    /// The study the trial belongs to.
    pub study_name: String,
    /// Name for the trial; must be unique once persisted.
    pub name: String,
    /// The proposed parameter assignment.
    pub parameter_values: Option<ParameterValues>,
}

impl TrialProposal {
    /// A proposal with no parameter assignment.
    #[must_use]
    pub fn new(study_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            study_name: study_name.into(),
            name: name.into(),
            parameter_values: None,
        }
    }

    /// Sets one parameter of the assignment.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameter_values
            .get_or_insert_with(ParameterValues::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replaces the whole assignment.
    #[must_use]
    pub fn with_params(mut self, parameter_values: ParameterValues) -> Self {
        self.parameter_values = Some(parameter_values);
        self
    }
}

/// Trait for pluggable search algorithms.
///
/// A strategy turns a study and its history into new trial proposals. The
/// trait requires `Send + Sync` so one instance can serve every study that
/// names it.
pub trait SuggestionStrategy: Send + Sync {
    /// Proposes up to `count` new trials for `study`.
    ///
    /// # Arguments
    ///
    /// * `study` - The study, including its configuration (search space and goal).
    /// * `trials` - Every trial of the study so far, in any status, in id order.
    /// * `count` - How many proposals were requested.
    ///
    /// History-free strategies (random, grid, quasi-random) may ignore
    /// `trials`. Returning more than `count` proposals, or proposals for a
    /// different study, is rejected by the caller. Proposals need not be
    /// distinct.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures, typically as
    /// [`Error::Strategy`](crate::Error::Strategy).
    fn get_new_suggestions(
        &self,
        study: &Study,
        trials: &[Trial],
        count: usize,
    ) -> Result<Vec<TrialProposal>>;
}

impl<F> SuggestionStrategy for F
where
    F: Fn(&Study, &[Trial], usize) -> Result<Vec<TrialProposal>> + Send + Sync,
{
    fn get_new_suggestions(
        &self,
        study: &Study,
        trials: &[Trial],
        count: usize,
    ) -> Result<Vec<TrialProposal>> {
        self(study, trials, count)
    }
}
