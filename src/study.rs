//! The study record: a tuning session over one search space.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::StudyConfiguration;
use crate::error::{Error, Result};
use crate::storage::Record;
use crate::trial::Trial;
use crate::types::{Goal, StudyStatus};

/// A tuning session: a search space, a goal, and the algorithm that proposes
/// its trials.
///
/// Studies are created through [`Advisor::create_study`](crate::Advisor::create_study)
/// or [`Registry::create_study`](crate::Registry::create_study). The
/// configuration is kept as a canonical JSON string (object keys sorted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Study {
    id: u64,
    name: String,
    study_configuration: String,
    algorithm: String,
    status: StudyStatus,
    created_time: DateTime<Utc>,
    updated_time: DateTime<Utc>,
}

impl Study {
    /// Builds a pending study, serializing `configuration` canonically.
    pub(crate) fn new(
        id: u64,
        name: impl Into<String>,
        configuration: &impl Serialize,
        algorithm: impl Into<String>,
    ) -> Result<Self> {
        let document = serde_json::to_value(configuration)
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        if !document.is_object() {
            return Err(Error::InvalidConfiguration(
                "configuration must be a JSON object".to_owned(),
            ));
        }
        let study_configuration = serde_json::to_string(&document)
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;

        let now = Utc::now();
        Ok(Self {
            id,
            name: name.into(),
            study_configuration,
            algorithm: algorithm.into(),
            status: StudyStatus::Pending,
            created_time: now,
            updated_time: now,
        })
    }

    /// The study's dense id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The study's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored configuration document.
    #[must_use]
    pub fn study_configuration(&self) -> &str {
        &self.study_configuration
    }

    /// Name of the strategy that proposes trials for this study.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> StudyStatus {
        self.status
    }

    /// Returns `true` once the study has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == StudyStatus::Completed
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

    /// Parses the stored configuration as an untyped JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the stored string is not JSON.
    pub fn configuration_value(&self) -> Result<Value> {
        serde_json::from_str(&self.study_configuration)
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))
    }

    /// Parses the stored configuration into its typed view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the document does not match
    /// [`StudyConfiguration`].
    pub fn configuration(&self) -> Result<StudyConfiguration> {
        StudyConfiguration::from_json(&self.study_configuration)
    }

    /// The declared goal, or `None` if it is missing or not
    /// `MAXIMIZE`/`MINIMIZE`.
    #[must_use]
    pub fn goal(&self) -> Option<Goal> {
        let document = self.configuration_value().ok()?;
        document.get("goal")?.as_str()?.parse().ok()
    }

    /// Moves the study to [`Completed`](StudyStatus::Completed).
    ///
    /// `trials` must be the study's trials; the transition is refused while
    /// any of them is still pending. Completing an already completed study
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrialsPending`] if some trial is not completed.
    pub fn complete<'a>(&mut self, trials: impl IntoIterator<Item = &'a Trial>) -> Result<()> {
        if self.is_completed() {
            return Ok(());
        }
        let pending = trials.into_iter().filter(|t| !t.is_completed()).count();
        if pending > 0 {
            return Err(Error::TrialsPending {
                study: self.name.clone(),
                pending,
            });
        }
        self.status = StudyStatus::Completed;
        self.updated_time = Utc::now();
        Ok(())
    }

    /// The record as a field-named JSON document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Record for Study {
    const KIND: &'static str = "study";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn field(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "study_configuration" => Some(json!(self.study_configuration)),
            "algorithm" => Some(json!(self.algorithm)),
            "status" => Some(json!(self.status.as_str())),
            "created_time" => Some(json!(self.created_time)),
            "updated_time" => Some(json!(self.updated_time)),
            _ => None,
        }
    }
}

impl core::fmt::Display for Study {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.id, self.name)
    }
}
