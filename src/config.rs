//! Typed view over a study's configuration document.
//!
//! A study stores its configuration as a canonical JSON string. Strategies
//! read it back through [`StudyConfiguration`]:
//!
//! ```
//! use advisor::config::{ParameterType, StudyConfiguration};
//! use advisor::Goal;
//!
//! let config: StudyConfiguration = serde_json::from_str(
//!     r#"{
//!         "goal": "MAXIMIZE",
//!         "maxTrials": 20,
//!         "params": [
//!             {"parameterName": "lr", "type": "DOUBLE", "minValue": 0.001, "maxValue": 0.1},
//!             {"parameterName": "optimizer", "type": "CATEGORICAL", "feasiblePoints": "sgd, adam"}
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.goal(), Some(Goal::Maximize));
//! assert_eq!(config.params[1].r#type, ParameterType::Categorical);
//! assert_eq!(config.params[1].feasible_points(), vec!["sgd", "adam"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Goal;

/// The search space and goal of a study.
///
/// Unknown fields in the stored document are ignored by this view but kept
/// in the study's stored string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyConfiguration {
    /// Raw goal string; see [`goal`](Self::goal).
    pub goal: String,
    /// Upper bound on the number of trials the caller intends to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_trials: Option<u64>,
    /// How many trials the caller evaluates concurrently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_trials: Option<u64>,
    /// Trials a history-driven strategy should draw at random before modelling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_init_trials: Option<u64>,
    /// Parameter definitions.
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
}

impl StudyConfiguration {
    /// Creates a configuration with the given goal and no parameters.
    #[must_use]
    pub fn new(goal: Goal) -> Self {
        Self {
            goal: goal.as_str().to_owned(),
            max_trials: None,
            max_parallel_trials: None,
            random_init_trials: None,
            params: Vec::new(),
        }
    }

    /// Appends a parameter definition.
    #[must_use]
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Sets the trial budget.
    #[must_use]
    pub fn max_trials(mut self, n: u64) -> Self {
        self.max_trials = Some(n);
        self
    }

    /// Parses the goal; `None` if it is neither `MAXIMIZE` nor `MINIMIZE`.
    #[must_use]
    pub fn goal(&self) -> Option<Goal> {
        self.goal.parse().ok()
    }

    /// Parses a stored configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `raw` is not a valid
    /// configuration document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::InvalidConfiguration(e.to_string()))
    }

    /// Looks up a parameter definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.parameter_name == name)
    }

    /// Checks every parameter definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] on the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        self.params.iter().try_for_each(ParameterSpec::validate)
    }
}

/// The kind of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterType {
    /// Continuous range `[minValue, maxValue]`.
    Double,
    /// Integer range `[minValue, maxValue]`.
    Integer,
    /// Numeric values listed in `feasiblePoints`.
    Discrete,
    /// Labels listed in `feasiblePoints`.
    Categorical,
}

/// How a numeric range is explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScalingType {
    /// Uniform in the value itself.
    #[default]
    Linear,
    /// Uniform in the logarithm of the value.
    Log,
}

/// One parameter of the search space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Name under which the value appears in a trial's assignment.
    pub parameter_name: String,
    /// Parameter kind.
    pub r#type: ParameterType,
    /// Lower bound for `DOUBLE`/`INTEGER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Upper bound for `DOUBLE`/`INTEGER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Comma separated values for `DISCRETE`/`CATEGORICAL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasible_points: Option<String>,
    /// Scaling of a numeric range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_type: Option<ScalingType>,
}

impl ParameterSpec {
    /// A continuous parameter over `[low, high]`.
    #[must_use]
    pub fn double(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::range(name, ParameterType::Double, low, high)
    }

    /// An integer parameter over `[low, high]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn integer(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self::range(name, ParameterType::Integer, low as f64, high as f64)
    }

    /// A categorical parameter over `choices`.
    #[must_use]
    pub fn categorical<S: AsRef<str>>(name: impl Into<String>, choices: &[S]) -> Self {
        Self::points(name, ParameterType::Categorical, choices)
    }

    /// A discrete numeric parameter over `points`.
    #[must_use]
    pub fn discrete(name: impl Into<String>, points: &[f64]) -> Self {
        let labels: Vec<String> = points.iter().map(ToString::to_string).collect();
        Self::points(name, ParameterType::Discrete, &labels)
    }

    /// Switches a numeric range to log scaling.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.scaling_type = Some(ScalingType::Log);
        self
    }

    fn range(name: impl Into<String>, r#type: ParameterType, low: f64, high: f64) -> Self {
        Self {
            parameter_name: name.into(),
            r#type,
            min_value: Some(low),
            max_value: Some(high),
            feasible_points: None,
            scaling_type: None,
        }
    }

    fn points<S: AsRef<str>>(name: impl Into<String>, r#type: ParameterType, points: &[S]) -> Self {
        let joined = points
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            parameter_name: name.into(),
            r#type,
            min_value: None,
            max_value: None,
            feasible_points: Some(joined),
            scaling_type: None,
        }
    }

    /// Splits `feasiblePoints` into trimmed, non-empty entries.
    #[must_use]
    pub fn feasible_points(&self) -> Vec<&str> {
        self.feasible_points
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Checks that the definition is usable for its type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a range is missing or
    /// inverted, a log-scaled range is not positive, or a point list is empty
    /// or (for `DISCRETE`) not numeric.
    pub fn validate(&self) -> Result<()> {
        let name = &self.parameter_name;
        match self.r#type {
            ParameterType::Double | ParameterType::Integer => {
                let (Some(low), Some(high)) = (self.min_value, self.max_value) else {
                    return Err(Error::InvalidConfiguration(format!(
                        "parameter '{name}' needs minValue and maxValue"
                    )));
                };
                if low > high {
                    return Err(Error::InvalidConfiguration(format!(
                        "parameter '{name}': minValue ({low}) exceeds maxValue ({high})"
                    )));
                }
                if self.scaling_type == Some(ScalingType::Log) && low <= 0.0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "parameter '{name}': log scaling needs a positive minValue"
                    )));
                }
            }
            ParameterType::Discrete | ParameterType::Categorical => {
                let points = self.feasible_points();
                if points.is_empty() {
                    return Err(Error::InvalidConfiguration(format!(
                        "parameter '{name}' has no feasiblePoints"
                    )));
                }
                if self.r#type == ParameterType::Discrete
                    && points.iter().any(|p| p.parse::<f64>().is_err())
                {
                    return Err(Error::InvalidConfiguration(format!(
                        "parameter '{name}': discrete feasiblePoints must be numeric"
                    )));
                }
            }
        }
        Ok(())
    }
}
