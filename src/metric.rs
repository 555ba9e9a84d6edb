//! The trial metric record: one reported measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::storage::Record;

/// One measurement reported for a trial.
///
/// Metrics are append-only. A trial's metrics, in creation order, form its
/// measurement history; `training_step` is absent for single-shot final
/// metrics. Metrics carry no name and are looked up by id or by `trial_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialMetric {
    id: u64,
    trial_id: u64,
    training_step: Option<u64>,
    objective_value: f64,
    created_time: DateTime<Utc>,
    updated_time: DateTime<Utc>,
}

impl TrialMetric {
    pub(crate) fn new(
        id: u64,
        trial_id: u64,
        training_step: Option<u64>,
        objective_value: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            trial_id,
            training_step,
            objective_value,
            created_time: now,
            updated_time: now,
        }
    }

    /// The metric's dense id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Id of the trial this measurement belongs to.
    #[must_use]
    pub fn trial_id(&self) -> u64 {
        self.trial_id
    }

    /// Training step, if the metric is part of a series.
    #[must_use]
    pub fn training_step(&self) -> Option<u64> {
        self.training_step
    }

    /// The measured objective value.
    #[must_use]
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_time(&self) -> DateTime<Utc> {
        self.created_time
    }

    /// Timestamp of the last mutation.
    #[must_use]
    pub fn updated_time(&self) -> DateTime<Utc> {
        self.updated_time
    }

    /// The record as a field-named JSON document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Record for TrialMetric {
    const KIND: &'static str = "trial metric";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn field(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "trial_id" => Some(json!(self.trial_id)),
            "training_step" => Some(json!(self.training_step)),
            "objective_value" => Some(json!(self.objective_value)),
            "created_time" => Some(json!(self.created_time)),
            "updated_time" => Some(json!(self.updated_time)),
            _ => None,
        }
    }
}

impl core::fmt::Display for TrialMetric {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.training_step {
            Some(step) => write!(
                f,
                "Id: {}, trial id: {}, training_step: {step}",
                self.id, self.trial_id
            ),
            None => write!(f, "Id: {}, trial id: {}", self.id, self.trial_id),
        }
    }
}
