//! Nested snapshot document
//!
//! The merge target for one extraction cycle. Every key maps either to a
//! nested scope or to a scalar string. Keys are kept sorted so encoded
//! snapshots are byte-stable across cycles when the store does not change.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// A value stored under one document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocValue {
    Nested(Document),
    Scalar(String),
}

impl DocValue {
    pub fn as_nested(&self) -> Option<&Document> {
        match self {
            DocValue::Nested(doc) => Some(doc),
            DocValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            DocValue::Scalar(value) => Some(value),
            DocValue::Nested(_) => None,
        }
    }
}

/// One mapping level of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    entries: BTreeMap<String, DocValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.entries.get(key)
    }

    /// Follow `segments` through nested scopes, read-only.
    pub fn lookup<'a, I>(&self, segments: I) -> Option<&DocValue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut segments = segments.into_iter();
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = current.as_nested()?.entries.get(segment)?;
        }
        Some(current)
    }

    /// Write a scalar under `key`, discarding whatever the key held before.
    pub fn set_scalar(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.to_owned(), DocValue::Scalar(value.into()));
    }

    /// Enter the scope stored under `key`.
    ///
    /// A missing key gets a fresh empty scope. A key holding a scalar has the
    /// scalar dropped and replaced by an empty scope.
    pub fn scope_mut(&mut self, key: &str) -> &mut Document {
        let slot = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| DocValue::Nested(Document::new()));
        loop {
            match slot {
                DocValue::Nested(doc) => return doc,
                DocValue::Scalar(_) => *slot = DocValue::Nested(Document::new()),
            }
        }
    }

    /// Descend through every key in `path`, creating or replacing scopes.
    pub fn descend<'a, I>(&mut self, path: I) -> &mut Document
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .fold(self, |level, segment| level.scope_mut(segment))
    }

    /// Convert into a `serde_json::Value` tree.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        DocValue::Nested(doc) => doc.to_json(),
                        DocValue::Scalar(s) => serde_json::Value::String(s.clone()),
                    };
                    (key.clone(), value)
                })
                .collect(),
        )
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocValue::Nested(doc) => doc.serialize(serializer),
            DocValue::Scalar(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
