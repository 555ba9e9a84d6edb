//! Core enums shared by the entity records.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The optimization goal declared by a study configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Goal {
    /// Larger objective values are better.
    Maximize,
    /// Smaller objective values are better.
    Minimize,
}

impl Goal {
    /// Returns `true` if `candidate` strictly beats `best` under this goal.
    #[must_use]
    pub fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Goal::Maximize => candidate > best,
            Goal::Minimize => candidate < best,
        }
    }

    /// The wire string for this goal.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Maximize => "MAXIMIZE",
            Goal::Minimize => "MINIMIZE",
        }
    }
}

impl FromStr for Goal {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAXIMIZE" => Ok(Goal::Maximize),
            "MINIMIZE" => Ok(Goal::Minimize),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a study.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyStatus {
    /// Trials may still be outstanding.
    #[default]
    Pending,
    /// Every trial finished. Terminal.
    Completed,
}

/// Lifecycle status of a trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    /// Proposed but not yet evaluated.
    #[default]
    Pending,
    /// Evaluated, objective value recorded.
    Completed,
}

/// Availability of a registered algorithm descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlgorithmStatus {
    /// The algorithm can be dispatched to.
    #[default]
    Available,
}

macro_rules! status_str {
    ($ty:ty { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// The wire string for this status.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_str!(StudyStatus { Pending => "Pending", Completed => "Completed" });
status_str!(TrialStatus { Pending => "Pending", Completed => "Completed" });
status_str!(AlgorithmStatus { Available => "AVAILABLE" });
