use archery::RcK;
use mal_util::Dupe;
use rpds::HashTrieMap;
use rustc_hash::FxBuildHasher;

use crate::{
   Value,
   value::SString,
};

/// A hash map key. Only strings and keywords can be keys.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
   String(SString),
   Keyword(SString),
}

impl Dupe for Key {}

impl TryFrom<&Value> for Key {
   type Error = ();

   fn try_from(value: &Value) -> Result<Self, Self::Error> {
      match *value {
         Value::String(ref string) => Ok(Self::String(string.dupe())),
         Value::Keyword(ref keyword) => Ok(Self::Keyword(keyword.dupe())),
         _ => Err(()),
      }
   }
}

impl From<Key> for Value {
   fn from(key: Key) -> Self {
      match key {
         Key::String(string) => Self::String(string),
         Key::Keyword(keyword) => Self::Keyword(keyword),
      }
   }
}

/// A persistent hash map. Insertions and removals return new maps and leave
/// the receiver untouched.
#[derive(Clone)]
pub struct Map(HashTrieMap<Key, Value, RcK, FxBuildHasher>);

impl Dupe for Map {}

impl PartialEq for Map {
   fn eq(&self, other: &Self) -> bool {
      self.len() == other.len()
         && self
            .iter()
            .all(|(key, value)| other.get(key) == Some(value))
   }
}

impl FromIterator<(Key, Value)> for Map {
   fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
      iter
         .into_iter()
         .fold(Self::new(), |map, (key, value)| map.insert(key, value))
   }
}

impl Map {
   #[must_use]
   pub fn new() -> Self {
      Self(HashTrieMap::new_with_hasher_and_ptr_kind(FxBuildHasher))
   }

   #[must_use]
   pub fn insert(&self, key: Key, value: Value) -> Self {
      Self(self.0.insert(key, value))
   }

   #[must_use]
   pub fn remove(&self, key: &Key) -> Self {
      Self(self.0.remove(key))
   }

   #[must_use]
   pub fn get(&self, key: &Key) -> Option<&Value> {
      self.0.get(key)
   }

   #[must_use]
   pub fn contains(&self, key: &Key) -> bool {
      self.0.contains_key(key)
   }

   #[must_use]
   pub fn len(&self) -> usize {
      self.0.size()
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
      self.0.iter()
   }

   /// Returns the entries ordered by key.
   #[must_use]
   pub fn sorted(&self) -> Vec<(&Key, &Value)> {
      let mut entries = self.iter().collect::<Vec<_>>();
      entries.sort_by_key(|&(key, _)| key);
      entries
   }
}
