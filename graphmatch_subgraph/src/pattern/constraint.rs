//! Property constraints on pattern nodes and relationships.

use graphmatch_common::{StoreError, Value};
use indexmap::IndexMap;

/// Predicate over a single (possibly absent) property value.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueMatcher {
    /// The property must be set, whatever its value.
    Exists,
    /// The property must equal the value, or contain it if the property is
    /// multi-valued.
    Equals(Value),
}

impl ValueMatcher {
    /// Evaluate against a property value; `None` is an absent property.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, None) => false,
            (ValueMatcher::Exists, Some(_)) => true,
            (ValueMatcher::Equals(expected), Some(actual)) => actual.equals_or_contains(expected),
        }
    }
}

/// Ordered property constraints, grouped by key.
///
/// Keys are checked in insertion order, and each key is read from the
/// store once however many matchers it carries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyConstraints {
    by_key: IndexMap<String, Vec<ValueMatcher>>,
}

impl PropertyConstraints {
    /// Require that `key` is set.
    pub fn add_exists(&mut self, key: impl Into<String>) {
        self.add(key, ValueMatcher::Exists);
    }

    /// Require that `key` equals (or contains) `value`.
    pub fn add_equals(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.add(key, ValueMatcher::Equals(value.into()));
    }

    /// Attach an arbitrary matcher to `key`.
    pub fn add(&mut self, key: impl Into<String>, matcher: ValueMatcher) {
        self.by_key.entry(key.into()).or_default().push(matcher);
    }

    /// True when nothing is constrained.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Constraints per key in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValueMatcher])> {
        self.by_key.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Evaluate every constraint, reading properties through `lookup`.
    ///
    /// Stops at the first failing key. Store errors are passed through.
    pub fn check<F>(&self, mut lookup: F) -> Result<bool, StoreError>
    where
        F: FnMut(&str) -> Result<Option<Value>, StoreError>,
    {
        for (key, matchers) in &self.by_key {
            let value = lookup(key)?;
            if !matchers.iter().all(|m| m.matches(value.as_ref())) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
