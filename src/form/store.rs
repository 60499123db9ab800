//! Field-State Store: the current value of every configured field.
//!
//! The key set is fixed when the store is created and always equals the set of
//! descriptor ids. Updates replace one value and leave the rest untouched. No
//! validation happens here.

use super::descriptor::FieldDescriptor;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field: {0}")]
pub struct UnknownFieldError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate field id: {0}")]
pub struct DuplicateFieldError(pub String);

/// Mapping from field id to the value typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldStateSnapshot(BTreeMap<String, String>);

impl FieldStateSnapshot {
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldStateSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Builds a fresh all-empty snapshot for one form instance.
#[must_use]
pub fn initial_snapshot(descriptors: &[FieldDescriptor]) -> FieldStateSnapshot {
    descriptors
        .iter()
        .map(|descriptor| (descriptor.id.clone(), String::new()))
        .collect()
}

#[derive(Clone, Debug)]
pub struct FieldStore {
    descriptors: Vec<FieldDescriptor>,
    values: FieldStateSnapshot,
}

impl FieldStore {
    /// Seeds the store from the descriptor registry.
    ///
    /// # Errors
    /// Returns `DuplicateFieldError` if two descriptors share an id.
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Result<Self, DuplicateFieldError> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            if !seen.insert(descriptor.id.as_str()) {
                return Err(DuplicateFieldError(descriptor.id.clone()));
            }
        }

        let values = initial_snapshot(&descriptors);
        Ok(Self {
            descriptors,
            values,
        })
    }

    #[must_use]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// # Errors
    /// Returns `UnknownFieldError` if `field_id` is not a configured field.
    pub fn get_value(&self, field_id: &str) -> Result<&str, UnknownFieldError> {
        self.values
            .get(field_id)
            .ok_or_else(|| UnknownFieldError(field_id.to_string()))
    }

    /// Replaces the value of one field and returns the updated snapshot.
    ///
    /// # Errors
    /// Returns `UnknownFieldError` if `field_id` is not a configured field; the
    /// store is left unchanged.
    pub fn set_value(
        &mut self,
        field_id: &str,
        new_value: impl Into<String>,
    ) -> Result<&FieldStateSnapshot, UnknownFieldError> {
        let slot = self
            .values
            .0
            .get_mut(field_id)
            .ok_or_else(|| UnknownFieldError(field_id.to_string()))?;
        *slot = new_value.into();
        Ok(&self.values)
    }

    #[must_use]
    pub fn snapshot(&self) -> FieldStateSnapshot {
        self.values.clone()
    }

    /// Clears every value back to the empty string.
    pub fn reset(&mut self) {
        self.values = initial_snapshot(&self.descriptors);
    }
}
