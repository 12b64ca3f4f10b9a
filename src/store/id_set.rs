//! Set of user ids used by the follow graph and like sets.
//!
//! Snapshots store a set as a JSON object whose keys are the ids and whose
//! values are empty objects (`{"alice": {}, "bob": {}}`). Plain arrays are
//! accepted on read as well.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet(BTreeSet<String>);

impl IdSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    /// Flip membership; returns whether `id` is a member afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IdSet(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Serialize)]
struct Marker {}

impl Serialize for IdSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|id| (id, Marker {})))
    }
}

impl<'de> Deserialize<'de> for IdSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdSetVisitor)
    }
}

struct IdSetVisitor;

impl<'de> Visitor<'de> for IdSetVisitor {
    type Value = IdSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object keyed by id or an array of ids")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<IdSet, A::Error> {
        let mut set = BTreeSet::new();
        while let Some((id, IgnoredAny)) = map.next_entry::<String, IgnoredAny>()? {
            if !id.is_empty() {
                set.insert(id);
            }
        }
        Ok(IdSet(set))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<IdSet, A::Error> {
        let mut set = BTreeSet::new();
        while let Some(id) = seq.next_element::<String>()? {
            if !id.is_empty() {
                set.insert(id);
            }
        }
        Ok(IdSet(set))
    }

    fn visit_unit<E: de::Error>(self) -> Result<IdSet, E> {
        Ok(IdSet::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<IdSet, E> {
        Ok(IdSet::default())
    }
}
