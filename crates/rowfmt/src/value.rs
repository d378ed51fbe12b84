//! Value sources: resolving field keys to display text.
//!
//! A [`ValueSource`] answers "what text goes where key K appears" without
//! saying where K's value lives. Three shapes are provided: a fixed
//! [`MapSource`], any closure of the right signature, and [`Projection`],
//! the reusable adapter that extracts fields from one externally supplied
//! current record.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;

use crate::error::{ProjectionError, ResolveError};

/// Resolves a field key to display text, or fails.
pub trait ValueSource {
    /// The value for `key`, or a [`ResolveError`] describing why it has
    /// none.
    fn get(&self, key: &str) -> Result<String, ResolveError>;
}

/// Closures act as ad-hoc value sources.
impl<F> ValueSource for F
where
    F: Fn(&str) -> Result<String, ResolveError>,
{
    fn get(&self, key: &str) -> Result<String, ResolveError> {
        self(key)
    }
}

/// A fixed key-to-value mapping.
///
/// Lookups fail with [`ResolveError::NotFound`] for absent keys. Values are
/// stored as anything [`Display`]able and converted at resolution time.
#[derive(Clone, Debug, Default)]
pub struct MapSource<V> {
    values: HashMap<String, V>,
}

impl<V: Display> MapSource<V> {
    /// Creates an empty source.
    pub fn new() -> Self {
        MapSource {
            values: HashMap::new(),
        }
    }

    /// Inserts a value, replacing any previous one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), value);
    }
}

impl<V> From<HashMap<String, V>> for MapSource<V> {
    fn from(values: HashMap<String, V>) -> Self {
        MapSource { values }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for MapSource<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapSource {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}

impl<V: Display> ValueSource for MapSource<V> {
    fn get(&self, key: &str) -> Result<String, ResolveError> {
        match self.values.get(key) {
            Some(value) => Ok(value.to_string()),
            None => Err(ResolveError::NotFound(key.to_string())),
        }
    }
}

type Extractor<T> = Box<dyn Fn(&T) -> Result<String, ResolveError> + Send + Sync>;

enum Resolver<T> {
    Fields(HashMap<String, Extractor<T>>),
    Direct(Box<dyn Fn(&T, &str) -> Result<String, ResolveError> + Send + Sync>),
}

/// A reusable value source that extracts fields from one current record.
///
/// Built once from a fixed set of (key, extractor) pairs, then reused across
/// many records: [`set_current`](Projection::set_current) swaps the held
/// record, and [`ValueSource::get`] routes each key through the registered
/// extractor. Consulting the adapter before any record was set fails with
/// [`ResolveError::NoCurrent`], a different condition from an unregistered
/// key, which is [`ResolveError::NotFound`].
///
/// When the adapter is shared with other threads (wrap it in a `Mutex`),
/// hold the lock for the whole logical step, the `set_current` call plus
/// every `get` for that record, so two steps never interleave their slots.
pub struct Projection<T> {
    resolver: Resolver<T>,
    current: Option<T>,
}

impl<T> Projection<T> {
    /// Starts registering extractors.
    pub fn builder() -> ProjectionBuilder<T> {
        ProjectionBuilder {
            fields: HashMap::new(),
        }
    }

    /// The pass-through adapter for records that already resolve their own
    /// keys: every lookup is delegated to the current record itself.
    pub fn direct() -> Projection<T>
    where
        T: ValueSource,
    {
        Projection {
            resolver: Resolver::Direct(Box::new(|record, key| record.get(key))),
            current: None,
        }
    }

    /// Replaces the held record. The previous record, if any, is dropped.
    pub fn set_current(&mut self, record: T) {
        self.current = Some(record);
    }

    /// Resolves a borrowed record through the extractor table without
    /// touching the current-record slot.
    ///
    /// This is the width-discovery path: a batch can be measured in place
    /// while the slot keeps serving whichever record was last set.
    pub fn resolve(&self, record: &T, key: &str) -> Result<String, ResolveError> {
        match &self.resolver {
            Resolver::Fields(fields) => match fields.get(key) {
                Some(extract) => extract(record),
                None => Err(ResolveError::NotFound(key.to_string())),
            },
            Resolver::Direct(delegate) => delegate(record, key),
        }
    }
}

impl<T> ValueSource for Projection<T> {
    fn get(&self, key: &str) -> Result<String, ResolveError> {
        let record = self.current.as_ref().ok_or(ResolveError::NoCurrent)?;
        self.resolve(record, key)
    }
}

/// Registers extractors for a [`Projection`].
pub struct ProjectionBuilder<T> {
    fields: HashMap<String, Extractor<T>>,
}

impl<T> ProjectionBuilder<T> {
    /// Registers a pure extractor for `key`.
    ///
    /// Fails with [`ProjectionError::DuplicateField`] if the key already has
    /// one.
    pub fn field<F>(self, key: impl Into<String>, extract: F) -> Result<Self, ProjectionError>
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.insert(key.into(), Box::new(move |record| Ok(extract(record))))
    }

    /// Registers a fallible extractor for `key`.
    ///
    /// An extraction failure surfaces as [`ResolveError::Extract`] carrying
    /// the extractor's error as its source, so it becomes the root cause of
    /// the eventual formatting failure.
    pub fn try_field<F, E>(self, key: impl Into<String>, extract: F) -> Result<Self, ProjectionError>
    where
        F: Fn(&T) -> Result<String, E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let key = key.into();
        let owner = key.clone();
        self.insert(
            key,
            Box::new(move |record| {
                extract(record).map_err(|source| ResolveError::Extract {
                    key: owner.clone(),
                    source: Box::new(source),
                })
            }),
        )
    }

    fn insert(mut self, key: String, extract: Extractor<T>) -> Result<Self, ProjectionError> {
        match self.fields.entry(key) {
            Entry::Occupied(entry) => Err(ProjectionError::DuplicateField(entry.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(extract);
                Ok(self)
            }
        }
    }

    /// Seals the extractor table into an adapter with an empty slot.
    pub fn build(self) -> Projection<T> {
        Projection {
            resolver: Resolver::Fields(self.fields),
            current: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_lookup() {
        let values = MapSource::from_iter([("key", "test")]);
        assert_eq!(values.get("key").unwrap(), "test");
    }

    #[test]
    fn test_map_source_missing_key() {
        let values: MapSource<&str> = MapSource::new();
        let err = values.get("key").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(key) if key == "key"));
    }

    #[test]
    fn test_map_source_displays_values() {
        let values = MapSource::from_iter([("count", 42)]);
        assert_eq!(values.get("count").unwrap(), "42");
    }

    #[test]
    fn test_closure_source() {
        let source = |key: &str| Ok(key.to_uppercase());
        assert_eq!(ValueSource::get(&source, "abc").unwrap(), "ABC");
    }

    #[test]
    fn test_projection_extracts_from_current() {
        let mut adapter = Projection::builder()
            .field("len", |s: &String| s.len().to_string())
            .unwrap()
            .build();

        adapter.set_current("eagle".to_string());
        assert_eq!(adapter.get("len").unwrap(), "5");

        adapter.set_current("ox".to_string());
        assert_eq!(adapter.get("len").unwrap(), "2");
    }

    #[test]
    fn test_projection_without_current() {
        let adapter = Projection::builder()
            .field("key", |_: &u8| String::new())
            .unwrap()
            .build();

        let err = adapter.get("key").unwrap_err();
        assert!(matches!(err, ResolveError::NoCurrent));
    }

    #[test]
    fn test_projection_unknown_key() {
        let mut adapter = Projection::builder()
            .field("known", |_: &u8| String::new())
            .unwrap()
            .build();

        adapter.set_current(0);
        let err = adapter.get("other").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(key) if key == "other"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Projection::builder()
            .field("key", |_: &u8| String::new())
            .unwrap()
            .field("key", |_: &u8| String::new());

        assert_eq!(
            result.err(),
            Some(ProjectionError::DuplicateField("key".into()))
        );
    }

    #[test]
    fn test_try_field_failure_carries_key() {
        let mut adapter = Projection::builder()
            .try_field("parsed", |s: &String| s.parse::<i64>().map(|n| n.to_string()))
            .unwrap()
            .build();

        adapter.set_current("not a number".to_string());
        let err = adapter.get("parsed").unwrap_err();
        assert!(matches!(err, ResolveError::Extract { key, .. } if key == "parsed"));
    }

    #[test]
    fn test_resolve_leaves_slot_untouched() {
        let mut adapter = Projection::builder()
            .field("len", |s: &String| s.len().to_string())
            .unwrap()
            .build();

        adapter.set_current("held".to_string());
        assert_eq!(adapter.resolve(&"probe!".to_string(), "len").unwrap(), "6");
        assert_eq!(adapter.get("len").unwrap(), "4");
    }

    #[test]
    fn test_direct_delegates_to_record() {
        let mut adapter = Projection::<MapSource<&str>>::direct();
        adapter.set_current(MapSource::from_iter([("key", "test")]));
        assert_eq!(adapter.get("key").unwrap(), "test");

        let err = adapter.get("other").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }
}
