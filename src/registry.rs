//! The entity registry: one [`Table`] per entity kind plus the lifecycle
//! operations that create and mutate records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::metric::TrialMetric;
use crate::param::ParameterValues;
use crate::storage::{Filter, Key, Table};
use crate::strategy::TrialProposal;
use crate::study::Study;
use crate::trial::Trial;

/// Owner of the study, trial, trial-metric and algorithm tables.
///
/// The registry is a plain single-threaded value; the
/// [`Advisor`](crate::Advisor) wraps it in a lock.
///
/// # Examples
///
/// ```
/// use advisor::{Registry, TrialStatus};
/// use serde_json::json;
///
/// let mut registry = Registry::new();
/// registry
///     .create_study("mnist", &json!({"goal": "MAXIMIZE"}), "RandomSearch")
///     .unwrap();
/// let trial = registry.create_trial("mnist", "mnist-0").unwrap();
/// assert_eq!(trial.status(), TrialStatus::Pending);
///
/// // Trials must reference an existing study.
/// assert!(registry.create_trial("cifar", "cifar-0").is_err());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    studies: Table<Study>,
    trials: Table<Trial>,
    trial_metrics: Table<TrialMetric>,
    algorithms: Table<Algorithm>,
}

impl Registry {
    /// Creates a registry with four empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The study table.
    #[must_use]
    pub fn studies(&self) -> &Table<Study> {
        &self.studies
    }

    /// The trial table.
    #[must_use]
    pub fn trials(&self) -> &Table<Trial> {
        &self.trials
    }

    /// The trial-metric table.
    #[must_use]
    pub fn trial_metrics(&self) -> &Table<TrialMetric> {
        &self.trial_metrics
    }

    /// The algorithm descriptor table.
    #[must_use]
    pub fn algorithms(&self) -> &Table<Algorithm> {
        &self.algorithms
    }

    /// Creates a pending study.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a study with this name exists, or
    /// [`Error::InvalidConfiguration`] if `configuration` does not serialize
    /// to a JSON object.
    pub fn create_study(
        &mut self,
        name: &str,
        configuration: &impl Serialize,
        algorithm: &str,
    ) -> Result<&Study> {
        if self.studies.exists(name) {
            return Err(Error::DuplicateName {
                kind: "study",
                name: name.to_owned(),
            });
        }
        let study = Study::new(self.studies.next_id(), name, configuration, algorithm)?;
        let study = self.studies.add(study)?;
        trace_info!(study = study.name(), id = study.id(), "study created");
        Ok(&*study)
    }

    /// Creates a pending trial with no parameter assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudyNotFound`] if `study_name` is not registered and
    /// [`Error::DuplicateName`] if the trial name is taken.
    pub fn create_trial(&mut self, study_name: &str, name: &str) -> Result<&Trial> {
        self.create_trial_with_params(study_name, name, None)
    }

    /// Creates a pending trial carrying a parameter assignment.
    ///
    /// # Errors
    ///
    /// Same as [`create_trial`](Self::create_trial).
    pub fn create_trial_with_params(
        &mut self,
        study_name: &str,
        name: &str,
        parameter_values: Option<ParameterValues>,
    ) -> Result<&Trial> {
        if !self.studies.exists(study_name) {
            return Err(Error::StudyNotFound(study_name.to_owned()));
        }
        let trial = Trial::new(self.trials.next_id(), study_name, name, parameter_values);
        let trial = self.trials.add(trial)?;
        trace_debug!(study = study_name, trial = trial.name(), "trial created");
        Ok(&*trial)
    }

    /// Persists a batch of proposals as trials, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudyNotFound`] if a proposal names an unknown study
    /// and [`Error::DuplicateName`] if a proposal's name is already taken or
    /// repeated within the batch. Nothing is persisted on error.
    pub fn persist_proposals(&mut self, proposals: Vec<TrialProposal>) -> Result<Vec<Trial>> {
        let mut seen = HashSet::new();
        for proposal in &proposals {
            if !self.studies.exists(&proposal.study_name) {
                return Err(Error::StudyNotFound(proposal.study_name.clone()));
            }
            if self.trials.exists(&proposal.name) || !seen.insert(proposal.name.as_str()) {
                return Err(Error::DuplicateName {
                    kind: "trial",
                    name: proposal.name.clone(),
                });
            }
        }

        let mut created = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let trial = self.create_trial_with_params(
                &proposal.study_name,
                &proposal.name,
                proposal.parameter_values,
            )?;
            created.push(trial.clone());
        }
        Ok(created)
    }

    /// Appends a measurement for `trial_id`.
    ///
    /// The trial is not looked up; metrics come from a trusted evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteObjective`] if `objective_value` is NaN or
    /// infinite.
    pub fn create_trial_metric(
        &mut self,
        trial_id: u64,
        training_step: Option<u64>,
        objective_value: f64,
    ) -> Result<&TrialMetric> {
        ensure_finite(objective_value)?;
        let metric = TrialMetric::new(
            self.trial_metrics.next_id(),
            trial_id,
            training_step,
            objective_value,
        );
        self.trial_metrics.add(metric).map(|m| &*m)
    }

    /// Registers an algorithm descriptor with status `AVAILABLE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if the name is already registered.
    pub fn create_algorithm(&mut self, name: &str) -> Result<&Algorithm> {
        let algorithm = Algorithm::new(self.algorithms.next_id(), name);
        self.algorithms.add(algorithm).map(|a| &*a)
    }

    /// All trials of a study, in id order. Linear in the number of trials.
    #[must_use]
    pub fn trials_of(&self, study_name: &str) -> Vec<&Trial> {
        self.trials
            .filter(&Filter::new().eq("study_name", study_name))
    }

    /// All metrics of a trial, in creation order.
    #[must_use]
    pub fn metrics_of(&self, trial_id: u64) -> Vec<&TrialMetric> {
        self.trial_metrics.filter_by(|m| m.trial_id() == trial_id)
    }

    /// Records the given measurements and completes the trial with the
    /// value of the last one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeries`] if `metrics` is empty,
    /// [`Error::NonFiniteObjective`] if any value is NaN or infinite,
    /// [`Error::NotFound`] if the trial does not exist and
    /// [`Error::TrialAlreadyCompleted`] if it is already completed. Nothing
    /// is written on error.
    pub fn complete_trial(
        &mut self,
        trial_id: u64,
        metrics: &[(Option<u64>, f64)],
    ) -> Result<&Trial> {
        let Some(&(_, objective_value)) = metrics.last() else {
            return Err(Error::EmptySeries);
        };
        for &(_, value) in metrics {
            ensure_finite(value)?;
        }
        self.trials.get_by_id(trial_id)?.ensure_pending()?;

        for &(step, value) in metrics {
            self.create_trial_metric(trial_id, step, value)?;
        }
        let trial = self.trials.get_mut(Key::Id(trial_id))?;
        trial.complete(objective_value)?;
        trace_info!(trial_id, objective_value, "trial completed");
        Ok(&*trial)
    }

    /// Moves a study to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown study and
    /// [`Error::TrialsPending`] while any of its trials is pending.
    pub fn complete_study(&mut self, study_name: &str) -> Result<&Study> {
        let trials = self.trials.filter_by(|t| t.study_name() == study_name);
        let study = self.studies.get_mut(Key::Name(study_name))?;
        study.complete(trials)?;
        Ok(&*study)
    }
}

// JSON has no encoding for NaN or infinities.
fn ensure_finite(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteObjective(value))
    }
}
