use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::{Filter, Key, Record};
use crate::error::{Error, Result};

/// An id-ordered arena with a secondary name index.
///
/// Lookups by id or by name are O(log n) / O(1). Both indices are updated
/// together on [`add`](Table::add) and [`remove`](Table::remove).
///
/// The table does no locking of its own; concurrent callers must serialize
/// access externally (the [`Advisor`](crate::Advisor) does so with a
/// read-write lock).
#[derive(Clone, Debug)]
pub struct Table<T> {
    items: BTreeMap<u64, T>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            by_name: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Record> Table<T> {
    /// Creates an empty table whose first id is 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from previously stored records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdOutOfSequence`] if the ids are not strictly
    /// ascending or not below `next_id`, and [`Error::DuplicateName`] if two
    /// records share a name.
    pub fn restore(records: Vec<T>, next_id: u64) -> Result<Self> {
        let mut table = Self::new();
        let mut floor = 0;
        for record in records {
            let id = record.id();
            if id < floor || id >= next_id {
                return Err(Error::IdOutOfSequence {
                    kind: T::KIND,
                    expected: floor,
                    got: id,
                });
            }
            if let Some(name) = record.name() {
                if table.by_name.insert(name.to_owned(), id).is_some() {
                    return Err(Error::DuplicateName {
                        kind: T::KIND,
                        name: name.to_owned(),
                    });
                }
            }
            table.items.insert(id, record);
            floor = id + 1;
        }
        table.next_id = next_id;
        Ok(table)
    }

    /// The id the next added record must carry.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdOutOfSequence`] if `record.id()` is not
    /// [`next_id`](Self::next_id), or [`Error::DuplicateName`] if the
    /// record's name is already taken. The table is unchanged on error.
    pub fn add(&mut self, record: T) -> Result<&mut T> {
        let id = record.id();
        if id != self.next_id {
            return Err(Error::IdOutOfSequence {
                kind: T::KIND,
                expected: self.next_id,
                got: id,
            });
        }
        if let Some(name) = record.name() {
            if self.by_name.contains_key(name) {
                return Err(Error::DuplicateName {
                    kind: T::KIND,
                    name: name.to_owned(),
                });
            }
        }

        let slot = match self.items.entry(id) {
            Entry::Vacant(slot) => slot,
            Entry::Occupied(_) => {
                return Err(Error::IdOutOfSequence {
                    kind: T::KIND,
                    expected: self.next_id,
                    got: id,
                });
            }
        };
        if let Some(name) = record.name() {
            self.by_name.insert(name.to_owned(), id);
        }
        self.next_id += 1;
        Ok(slot.insert(record))
    }

    /// Looks up a record by id or name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record matches.
    pub fn get(&self, key: Key<'_>) -> Result<&T> {
        match key {
            Key::Id(id) => self.get_by_id(id),
            Key::Name(name) => self.get_by_name(name),
        }
    }

    /// Looks up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has this id.
    pub fn get_by_id(&self, id: u64) -> Result<&T> {
        self.items
            .get(&id)
            .ok_or_else(|| Error::not_found(T::KIND, Key::Id(id)))
    }

    /// Looks up a record by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has this name.
    pub fn get_by_name(&self, name: &str) -> Result<&T> {
        self.by_name
            .get(name)
            .and_then(|id| self.items.get(id))
            .ok_or_else(|| Error::not_found(T::KIND, Key::Name(name)))
    }

    /// Mutable lookup by id or name.
    ///
    /// Callers must not change the record's id or name through the returned
    /// reference; the name index is not updated until the record is removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record matches.
    pub fn get_mut(&mut self, key: Key<'_>) -> Result<&mut T> {
        let id = match key {
            Key::Id(id) => id,
            Key::Name(name) => *self
                .by_name
                .get(name)
                .ok_or_else(|| Error::not_found(T::KIND, key))?,
        };
        self.items
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(T::KIND, key))
    }

    /// Returns `true` if a record with this name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns `true` if a record with this id exists.
    #[must_use]
    pub fn contains_id(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    /// Returns every record matching all conditions of `filter`, in id order.
    pub fn filter(&self, filter: &Filter) -> Vec<&T> {
        self.filter_by(|record| filter.matches(record))
    }

    /// Returns every record satisfying `predicate`, in id order.
    pub fn filter_by(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<&T> {
        self.items.values().filter(|r| predicate(r)).collect()
    }

    /// Removes a record from both indices.
    ///
    /// The id counter is not rewound; removed ids are never handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record matches.
    pub fn remove(&mut self, key: Key<'_>) -> Result<T> {
        let id = match key {
            Key::Id(id) => id,
            Key::Name(name) => *self
                .by_name
                .get(name)
                .ok_or_else(|| Error::not_found(T::KIND, key))?,
        };
        let record = self
            .items
            .remove(&id)
            .ok_or_else(|| Error::not_found(T::KIND, key))?;
        match record.name() {
            Some(name) if self.by_name.get(name) == Some(&id) => {
                self.by_name.remove(name);
            }
            // Renamed through `get_mut`: the index still holds the old name.
            _ => self.by_name.retain(|_, v| *v != id),
        }
        Ok(record)
    }

    /// Iterates over all records in ascending id order.
    pub fn list(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.values()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Serialize)]
struct TableRef<'a, T> {
    next_id: u64,
    items: Vec<&'a T>,
}

#[derive(Deserialize)]
struct TableOwned<T> {
    next_id: u64,
    items: Vec<T>,
}

impl<T: Serialize> Serialize for Table<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        TableRef {
            next_id: self.next_id,
            items: self.items.values().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Record + Deserialize<'de>> Deserialize<'de> for Table<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = TableOwned::<T>::deserialize(deserializer)?;
        Table::restore(raw.items, raw.next_id).map_err(de::Error::custom)
    }
}
