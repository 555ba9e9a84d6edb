//! The algorithm descriptor record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::storage::Record;
use crate::types::AlgorithmStatus;

/// A named entry describing a registered search algorithm.
///
/// Descriptors are bookkeeping only: suggestion requests are dispatched
/// through the [`StrategyRegistry`](crate::strategy::StrategyRegistry), not
/// through this table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    id: u64,
    name: String,
    status: AlgorithmStatus,
    created_time: DateTime<Utc>,
    updated_time: DateTime<Utc>,
}

impl Algorithm {
    pub(crate) fn new(id: u64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            status: AlgorithmStatus::Available,
            created_time: now,
            updated_time: now,
        }
    }

    /// The descriptor's dense id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The algorithm name studies refer to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Availability status.
    #[must_use]
    pub fn status(&self) -> AlgorithmStatus {
        self.status
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
}

impl Record for Algorithm {
    const KIND: &'static str = "algorithm";

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
            "status" => Some(json!(self.status.as_str())),
            "created_time" => Some(json!(self.created_time)),
            "updated_time" => Some(json!(self.updated_time)),
            _ => None,
        }
    }
}
