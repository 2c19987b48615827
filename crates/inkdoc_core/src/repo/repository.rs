//! Generic keyed resource store.
//!
//! # Responsibility
//! - Store shared resources addressed by a stable key.
//! - Provide add-if-absent insertion used by document merging.
//!
//! # Invariants
//! - Keys are unique; `add` never overwrites an existing entry.
//! - Enumeration order is ascending key order, so serialization is stable.

use crate::model::id::Identifier;
use crate::model::input::{Environment, InputContext, InputDevice, InputProvider, SensorContext};
use crate::model::sensor::SensorData;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Input entries carry the same key twice.
    DuplicateKey(String),
    /// Brush name is empty, starts with whitespace or holds control characters.
    InvalidBrushName(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate repository key: {key}"),
            Self::InvalidBrushName(name) => write!(f, "invalid brush name: `{name}`"),
        }
    }
}

impl Error for RepoError {}

/// Resource addressable by a unique key.
pub trait Keyed {
    type Key: Ord + Clone + Display + Debug;

    fn key(&self) -> Self::Key;
}

/// Add-if-absent keyed store.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository<T: Keyed> {
    entries: BTreeMap<T::Key, T>,
}

impl<T: Keyed> Default for Repository<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Keyed> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from entries, rejecting duplicate keys.
    pub fn try_from_entries(entries: impl IntoIterator<Item = T>) -> RepoResult<Self> {
        let mut repo = Self::new();
        for entity in entries {
            let key = entity.key();
            if !repo.add(entity) {
                return Err(RepoError::DuplicateKey(key.to_string()));
            }
        }
        Ok(repo)
    }

    /// Inserts `entity` unless its key is already present.
    ///
    /// Returns whether the entity was inserted. An existing entry is never
    /// replaced.
    pub fn add(&mut self, entity: T) -> bool {
        let key = entity.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entity);
        true
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.entries.contains_key(key)
    }

    /// All entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &T::Key> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds every entry of `other` whose key is absent here.
    ///
    /// Returns the number of entries inserted.
    pub fn merge_missing(&mut self, other: &Self) -> usize
    where
        T: Clone,
    {
        other
            .iter()
            .filter(|entity| self.add((*entity).clone()))
            .count()
    }
}

impl<T: Keyed + Serialize> Serialize for Repository<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, T> Deserialize<'de> for Repository<T>
where
    T: Keyed + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<T>::deserialize(deserializer)?;
        Self::try_from_entries(entries).map_err(serde::de::Error::custom)
    }
}

macro_rules! keyed_by_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                type Key = Identifier;

                fn key(&self) -> Identifier {
                    self.id
                }
            }
        )*
    };
}

keyed_by_id!(
    SensorData,
    Environment,
    InputProvider,
    InputDevice,
    InputContext,
    SensorContext,
);

/// Sensor data blocks keyed by id.
pub type SensorDataRepository = Repository<SensorData>;

#[cfg(test)]
mod tests {
    use super::{RepoError, Repository};
    use crate::model::id::Identifier;
    use crate::model::input::Environment;
    use std::collections::BTreeMap;

    fn environment(id: Identifier, os: &str) -> Environment {
        let mut properties = BTreeMap::new();
        properties.insert("os.name".to_string(), os.to_string());
        Environment { id, properties }
    }

    #[test]
    fn add_keeps_first_payload_for_same_id() {
        let id = Identifier::new();
        let mut repo = Repository::new();
        assert!(repo.add(environment(id, "linux")));
        assert!(!repo.add(environment(id, "android")));

        assert_eq!(repo.len(), 1);
        let stored = repo.get(&id).expect("entry should exist");
        assert_eq!(stored.properties["os.name"], "linux");
    }

    #[test]
    fn try_from_entries_rejects_duplicates() {
        let id = Identifier::new();
        let err = Repository::try_from_entries(vec![environment(id, "a"), environment(id, "b")])
            .unwrap_err();
        assert_eq!(err, RepoError::DuplicateKey(id.to_string()));
    }

    #[test]
    fn merge_missing_only_adds_absent_keys() {
        let shared = Identifier::new();
        let mut target = Repository::new();
        target.add(environment(shared, "kept"));

        let mut source = Repository::new();
        source.add(environment(shared, "ignored"));
        source.add(environment(Identifier::new(), "new"));

        assert_eq!(target.merge_missing(&source), 1);
        assert_eq!(target.len(), 2);
        assert_eq!(target.get(&shared).unwrap().properties["os.name"], "kept");
        assert_eq!(target.merge_missing(&source), 0);
    }

    #[test]
    fn serializes_as_sorted_array() {
        let mut repo = Repository::new();
        let a = Identifier::new();
        let b = Identifier::new();
        repo.add(environment(a, "a"));
        repo.add(environment(b, "b"));

        let json = serde_json::to_value(&repo).unwrap();
        let ids: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect();
        let mut expected = vec![a.to_string(), b.to_string()];
        expected.sort();
        assert_eq!(ids, expected);

        let back: Repository<Environment> = serde_json::from_value(json).unwrap();
        assert_eq!(back, repo);
    }
}
