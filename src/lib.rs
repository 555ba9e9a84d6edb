#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Orchestration core for a hyperparameter tuning service. It keeps studies,
//! trials and trial metrics in name- and id-indexed tables, delegates the
//! choice of new parameter values to pluggable suggestion strategies, and
//! tracks completion and the best trial of each study.
//!
//! # Getting Started
//!
//! Register a strategy, create a study, and drive the suggest/complete loop:
//!
//! ```
//! use advisor::prelude::*;
//! use serde_json::json;
//!
//! fn sweep(study: &Study, trials: &[Trial], count: usize) -> Result<Vec<TrialProposal>> {
//!     Ok((trials.len()..trials.len() + count)
//!         .map(|i| {
//!             TrialProposal::new(study.name(), format!("trial-{i}"))
//!                 .param("learning_rate", 0.01 * (i + 1) as f64)
//!         })
//!         .collect())
//! }
//!
//! let advisor = Advisor::builder()
//!     .strategy_instance("Sweep", sweep)
//!     .build()
//!     .unwrap();
//!
//! let config = StudyConfiguration::new(Goal::Minimize)
//!     .param(ParameterSpec::double("learning_rate", 0.001, 0.1));
//! advisor.create_study("lr", &config, "Sweep").unwrap();
//!
//! for trial in advisor.create_suggested_trials("lr", 3).unwrap() {
//!     let lr = trial.parameter_values().unwrap()["learning_rate"].as_f64().unwrap();
//!     advisor
//!         .complete_trial_with_one_metric(trial.id(), (lr - 0.02).abs())
//!         .unwrap();
//! }
//!
//! assert!(advisor.is_study_done("lr").unwrap());
//! let best = advisor.get_best_trial("lr").unwrap().unwrap();
//! assert_eq!(best.name(), "trial-1");
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Advisor`] | Create studies, request suggestions, complete trials, find the best trial. |
//! | [`Study`] | One tuning problem: a name, a JSON configuration with a goal, and an algorithm name. |
//! | [`Trial`] | One evaluation point proposed for a study, with its final objective value. |
//! | [`TrialMetric`] | One measurement reported for a trial, optionally at a training step. |
//! | [`SuggestionStrategy`](strategy::SuggestionStrategy) | Produces new trial proposals from a study and its history. |
//! | [`Table`](storage::Table) | The id- and name-indexed record store behind every entity. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at study, suggestion and completion points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod advisor;
mod algorithm;
pub mod config;
mod error;
mod metric;
mod param;
mod registry;
pub mod storage;
pub mod strategy;
mod study;
mod trial;
mod types;

pub use advisor::{Advisor, AdvisorBuilder, DEFAULT_ALGORITHM, RegistrySnapshot};
pub use algorithm::Algorithm;
pub use error::{Error, Result};
pub use metric::TrialMetric;
pub use param::{ParamValue, ParameterValues};
pub use registry::Registry;
pub use study::Study;
pub use trial::Trial;
pub use types::{AlgorithmStatus, Goal, StudyStatus, TrialStatus};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use advisor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::advisor::{Advisor, AdvisorBuilder, RegistrySnapshot};
    pub use crate::config::{ParameterSpec, ParameterType, ScalingType, StudyConfiguration};
    pub use crate::error::{Error, Result};
    pub use crate::metric::TrialMetric;
    pub use crate::param::{ParamValue, ParameterValues};
    pub use crate::strategy::{StrategyRegistry, SuggestionStrategy, TrialProposal};
    pub use crate::study::Study;
    pub use crate::trial::Trial;
    pub use crate::types::{Goal, StudyStatus, TrialStatus};
}
