use super::Advisor;
use crate::error::Result;
use crate::trial::Trial;
use crate::types::Goal;

impl Advisor {
    /// Returns the trial with the best objective value under the study's goal.
    ///
    /// Intended for completed studies: the caller is responsible for making
    /// sure every trial has finished (see [`is_study_done`](Self::is_study_done));
    /// this method does not check.
    ///
    /// Trials without an objective value are skipped. The first trial with a
    /// value is the initial candidate and is replaced only by a strictly
    /// better one, so ties keep the earliest trial.
    ///
    /// Returns `Ok(None)` when no trial has an objective value, or when the
    /// configured goal is missing or is neither `MAXIMIZE` nor `MINIMIZE`;
    /// [`Study::goal`](crate::Study::goal) tells the two cases apart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the study does
    /// not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use advisor::Advisor;
    /// use serde_json::json;
    ///
    /// let advisor = Advisor::new();
    /// advisor
    ///     .create_study("s", &json!({"goal": "MINIMIZE"}), "RandomSearch")
    ///     .unwrap();
    /// for (i, value) in [3.0, 7.0, 5.0].into_iter().enumerate() {
    ///     let trial = advisor.create_trial("s", &format!("t{i}")).unwrap();
    ///     advisor.complete_trial_with_one_metric(trial.id(), value).unwrap();
    /// }
    ///
    /// let best = advisor.get_best_trial("s").unwrap().unwrap();
    /// assert_eq!(best.objective_value(), Some(3.0));
    /// ```
    pub fn get_best_trial(&self, study_name: &str) -> Result<Option<Trial>> {
        let registry = self.registry.read();
        let study = registry.studies().get_by_name(study_name)?;
        let Some(goal) = study.goal() else {
            return Ok(None);
        };
        let trials = registry.trials_of(study_name);
        Ok(select_best(trials, goal).cloned())
    }
}

/// Picks the first trial holding the best objective value under `goal`.
pub(crate) fn select_best<'a>(
    trials: impl IntoIterator<Item = &'a Trial>,
    goal: Goal,
) -> Option<&'a Trial> {
    let mut best: Option<(&Trial, f64)> = None;
    for trial in trials {
        let Some(value) = trial.objective_value() else {
            continue;
        };
        match best {
            Some((_, best_value)) if !goal.improves(value, best_value) => {}
            _ => best = Some((trial, value)),
        }
    }
    best.map(|(trial, _)| trial)
}
