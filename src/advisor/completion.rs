use super::Advisor;
use crate::error::Result;
use crate::metric::TrialMetric;
use crate::study::Study;
use crate::trial::Trial;

impl Advisor {
    /// Appends one measurement for a trial.
    ///
    /// The trial is not looked up; measurements come from a trusted
    /// evaluator and may arrive for any id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteObjective`](crate::Error::NonFiniteObjective)
    /// if `objective_value` is NaN or infinite.
    pub fn create_trial_metric(
        &self,
        trial_id: u64,
        training_step: Option<u64>,
        objective_value: f64,
    ) -> Result<TrialMetric> {
        self.registry
            .write()
            .create_trial_metric(trial_id, training_step, objective_value)
            .cloned()
    }

    /// The measurement history of a trial, in creation order.
    #[must_use]
    pub fn list_trial_metrics(&self, trial_id: u64) -> Vec<TrialMetric> {
        self.registry
            .read()
            .metrics_of(trial_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Completes a trial from a single final measurement.
    ///
    /// Appends one metric without a training step, then sets the trial's
    /// objective to `objective_value` and its status to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) for an unknown
    /// trial and [`Error::TrialAlreadyCompleted`](crate::Error::TrialAlreadyCompleted)
    /// if the trial was completed before, and
    /// [`Error::NonFiniteObjective`](crate::Error::NonFiniteObjective) for a
    /// NaN or infinite value. Nothing is written on error.
    pub fn complete_trial_with_one_metric(
        &self,
        trial_id: u64,
        objective_value: f64,
    ) -> Result<Trial> {
        self.registry
            .write()
            .complete_trial(trial_id, &[(None, objective_value)])
            .cloned()
    }

    /// Completes a trial from a series of `(training_step, value)` pairs.
    ///
    /// Appends one metric per pair and sets the objective to the value of the
    /// **last** pair. The series is taken to be in chronological order; it is
    /// not sorted or checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use advisor::{Advisor, TrialStatus};
    /// use serde_json::json;
    ///
    /// let advisor = Advisor::new();
    /// advisor
    ///     .create_study("s", &json!({"goal": "MAXIMIZE"}), "RandomSearch")
    ///     .unwrap();
    /// let trial = advisor.create_trial("s", "t").unwrap();
    ///
    /// let trial = advisor
    ///     .complete_trial_with_series_metrics(trial.id(), &[(1, 0.2), (2, 0.5), (3, 0.9)])
    ///     .unwrap();
    /// assert_eq!(trial.status(), TrialStatus::Completed);
    /// assert_eq!(trial.objective_value(), Some(0.9));
    /// assert_eq!(advisor.list_trial_metrics(trial.id()).len(), 3);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeries`](crate::Error::EmptySeries) for an empty
    /// series, otherwise the same errors as
    /// [`complete_trial_with_one_metric`](Self::complete_trial_with_one_metric).
    pub fn complete_trial_with_series_metrics(
        &self,
        trial_id: u64,
        series: &[(u64, f64)],
    ) -> Result<Trial> {
        let metrics: Vec<(Option<u64>, f64)> = series
            .iter()
            .map(|&(step, value)| (Some(step), value))
            .collect();
        self.registry
            .write()
            .complete_trial(trial_id, &metrics)
            .cloned()
    }

    /// Reports whether a study is done, completing it when it is.
    ///
    /// A study already marked `Completed` is done without looking at its
    /// trials. Otherwise it is done when every trial is completed (trivially
    /// so when it has none); in that case it is moved to `Completed` through
    /// [`complete_study`](Self::complete_study) before returning `true`.
    /// A study with a pending trial is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the study does
    /// not exist.
    pub fn is_study_done(&self, study_name: &str) -> Result<bool> {
        let mut registry = self.registry.write();
        if registry.studies().get_by_name(study_name)?.is_completed() {
            return Ok(true);
        }
        if registry
            .trials_of(study_name)
            .iter()
            .any(|t| !t.is_completed())
        {
            return Ok(false);
        }
        registry.complete_study(study_name)?;
        trace_info!(study = study_name, "study completed");
        Ok(true)
    }

    /// Moves a study to `Completed`.
    ///
    /// This is the explicit form of the transition that
    /// [`is_study_done`](Self::is_study_done) performs. It is idempotent for
    /// a study that is already completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) for an unknown
    /// study and [`Error::TrialsPending`](crate::Error::TrialsPending) while
    /// any of its trials is pending.
    pub fn complete_study(&self, study_name: &str) -> Result<Study> {
        let study = self.registry.write().complete_study(study_name)?.clone();
        trace_info!(study = study_name, "study completed");
        Ok(study)
    }
}
