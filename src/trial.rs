//! The trial record: one parameter assignment proposed within a study.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::param::ParameterValues;
use crate::storage::Record;
use crate::types::TrialStatus;

/// One concrete parameter assignment proposed for evaluation.
///
/// A trial refers to its study by name. It starts out
/// [`Pending`](TrialStatus::Pending) with no objective value; a completion
/// call sets the objective exactly once and moves it to
/// [`Completed`](TrialStatus::Completed).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    id: u64,
    study_name: String,
    name: String,
    parameter_values: Option<ParameterValues>,
    objective_value: Option<f64>,
    status: TrialStatus,
    created_time: DateTime<Utc>,
    updated_time: DateTime<Utc>,
}

impl Trial {
    pub(crate) fn new(
        id: u64,
        study_name: impl Into<String>,
        name: impl Into<String>,
        parameter_values: Option<ParameterValues>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            study_name: study_name.into(),
            name: name.into(),
            parameter_values,
            objective_value: None,
            status: TrialStatus::Pending,
            created_time: now,
            updated_time: now,
        }
    }

    /// The trial's dense id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name of the owning study.
    #[must_use]
    pub fn study_name(&self) -> &str {
        &self.study_name
    }

    /// The trial's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter assignment, if the strategy provided one.
    #[must_use]
    pub fn parameter_values(&self) -> Option<&ParameterValues> {
        self.parameter_values.as_ref()
    }

    /// The final objective value, set on completion.
    #[must_use]
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> TrialStatus {
        self.status
    }

    /// Returns `true` once the trial has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TrialStatus::Completed
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

    /// Records the objective value and marks the trial completed.
    pub(crate) fn complete(&mut self, objective_value: f64) -> Result<()> {
        self.ensure_pending()?;
        self.objective_value = Some(objective_value);
        self.status = TrialStatus::Completed;
        self.updated_time = Utc::now();
        Ok(())
    }

    pub(crate) fn ensure_pending(&self) -> Result<()> {
        if self.is_completed() {
            return Err(Error::TrialAlreadyCompleted(self.id));
        }
        Ok(())
    }

    /// The record as a field-named JSON document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Record for Trial {
    const KIND: &'static str = "trial";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn field(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "study_name" => Some(json!(self.study_name)),
            "name" => Some(json!(self.name)),
            "parameter_values" => Some(json!(self.parameter_values)),
            "objective_value" => Some(json!(self.objective_value)),
            "status" => Some(json!(self.status.as_str())),
            "created_time" => Some(json!(self.created_time)),
            "updated_time" => Some(json!(self.updated_time)),
            _ => None,
        }
    }
}

impl core::fmt::Display for Trial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.id, self.name)
    }
}
