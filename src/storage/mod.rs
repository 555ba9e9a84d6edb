//! In-memory entity tables.
//!
//! Every entity kind lives in its own [`Table`]: an arena ordered by a dense
//! integer id plus a secondary name index. Ids are handed out sequentially
//! starting at 0 and are never reused, so [`Table::list`] yields records in
//! insertion order.
//!
//! # Implementing a record type
//!
//! Any type implementing [`Record`] can be stored. Records without a name
//! (such as trial metrics) are reachable by id only.
//!
//! ```
//! use advisor::storage::{Filter, Key, Record, Table};
//! use serde_json::{Value, json};
//!
//! struct Run {
//!     id: u64,
//!     name: String,
//!     owner: String,
//! }
//!
//! impl Record for Run {
//!     const KIND: &'static str = "run";
//!
//!     fn id(&self) -> u64 {
//!         self.id
//!     }
//!
//!     fn name(&self) -> Option<&str> {
//!         Some(&self.name)
//!     }
//!
//!     fn field(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "id" => Some(json!(self.id)),
//!             "name" => Some(json!(self.name)),
//!             "owner" => Some(json!(self.owner)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut runs = Table::new();
//! let id = runs.next_id();
//! runs.add(Run { id, name: "baseline".into(), owner: "ana".into() }).unwrap();
//!
//! assert!(runs.exists("baseline"));
//! assert_eq!(runs.get(Key::Id(0)).unwrap().owner, "ana");
//! assert_eq!(runs.filter(&Filter::new().eq("owner", "ana")).len(), 1);
//! ```

mod filter;
mod table;

use core::fmt;

pub use filter::Filter;
pub use table::Table;

/// A record that can live in a [`Table`].
pub trait Record {
    /// Entity kind used in error messages and log events.
    const KIND: &'static str;

    /// The record's dense integer id.
    fn id(&self) -> u64;

    /// The record's unique name, or `None` if the record is not name-indexed.
    fn name(&self) -> Option<&str>;

    /// The value of a named field, used for equality filtering.
    ///
    /// Returns `None` for fields the record does not have.
    fn field(&self, field: &str) -> Option<serde_json::Value>;
}

/// Point-lookup key: either the id or the name of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    /// Look up by dense integer id.
    Id(u64),
    /// Look up by unique name.
    Name(&'a str),
}

impl From<u64> for Key<'_> {
    fn from(id: u64) -> Self {
        Key::Id(id)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Id(id) => write!(f, "id {id}"),
            Key::Name(name) => write!(f, "name '{name}'"),
        }
    }
}
