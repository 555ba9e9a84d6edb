use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::Registry;

use super::Advisor;

/// Current snapshot schema version.
const SNAPSHOT_VERSION: u32 = 1;

/// A serializable snapshot of an advisor's tables.
///
/// # Schema versioning
///
/// The `version` field enables future schema evolution without breaking
/// existing files. The current version is `1`.
///
/// # Strategies
///
/// Strategies are code, not data, and are **not** included. Algorithm
/// descriptors are; register the matching strategies on the
/// [`AdvisorBuilder`](super::AdvisorBuilder) that loads the snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_time: DateTime<Utc>,
    /// All four tables, including their id counters.
    pub registry: Registry,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RegistrySnapshot {
    /// Wraps a copy of the tables in a snapshot taken now.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_time: Utc::now(),
            registry,
            metadata: HashMap::new(),
        }
    }

    pub(crate) fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Storage(e.to_string()))?;
        let snapshot: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Storage(e.to_string()))?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(Error::Storage(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        trace_info!(
            path = %path.display(),
            studies = snapshot.registry.studies().len(),
            trials = snapshot.registry.trials().len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        // Write next to the target, then rename over it.
        let parent = path.parent().unwrap_or(Path::new("."));
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
        let file = File::create(&tmp_path).map_err(|e| Error::Storage(e.to_string()))?;
        let written = self
            .write_to(file)
            .and_then(|()| std::fs::rename(&tmp_path, path).map_err(|e| e.to_string()));
        if let Err(message) = written {
            std::fs::remove_file(&tmp_path).ok();
            return Err(Error::Storage(message));
        }
        trace_info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn write_to(&self, file: File) -> core::result::Result<(), String> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| e.to_string())
    }
}

impl Advisor {
    /// Takes a snapshot of the current tables.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::new(self.registry())
    }

    /// Save the tables to a JSON file.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place, so an interrupted save leaves any previous file intact.
    ///
    /// # Errors
    ///
    /// Returns a [`Storage`](Error::Storage) error if the file cannot be
    /// created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.snapshot().write(path.as_ref())
    }

    /// Load an advisor from a JSON file written by [`save`](Self::save).
    ///
    /// The loaded advisor has no strategies registered. Use
    /// [`AdvisorBuilder::load`](super::AdvisorBuilder::load) to restore the
    /// tables and register strategies in one go.
    ///
    /// # Errors
    ///
    /// Returns a [`Storage`](Error::Storage) error if the file cannot be read
    /// or parsed, or was written by a newer schema version.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().load(path)?.build()
    }
}
