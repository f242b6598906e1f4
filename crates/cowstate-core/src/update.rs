//! Copy-on-write state updates.
//!
//! [`set`] applies one property, [`assign`] applies a batch. Both return a
//! [`Cow`]:
//!
//! - `Cow::Borrowed(state)` when every change is a no-op, meaning the new
//!   value is deep-equal to the current one, or an absent property is set to
//!   absent. The caller gets its own reference back.
//! - `Cow::Owned(clone)` as soon as one property really changes. The clone is
//!   made at the first change; later changes in the same batch write into it,
//!   so a batch clones at most once.
//!
//! A change value of `None` is the absent marker: a present property is
//! removed, never stored as null.
//!
//! The input state is never mutated.

use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::{debug, instrument, trace};

use crate::equality::DeepEq;
use crate::error::{UpdateError, json_kind};

/// JSON-shaped state: property names mapped to arbitrary JSON values.
pub type State = Map<String, Value>;

// ---------------------------------------------------------------------------
// PropertyMap
// ---------------------------------------------------------------------------

/// A string-keyed mapping the updater can read, clone and write.
///
/// `Clone` is the copy in copy-on-write: it runs once per batch at most.
pub trait PropertyMap: Clone {
    /// The value stored under each property.
    type Value;

    /// Current value of `key`, if present.
    fn property(&self, key: &str) -> Option<&Self::Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn insert_property(&mut self, key: String, value: Self::Value);

    /// Remove `key`, returning its previous value.
    fn remove_property(&mut self, key: &str) -> Option<Self::Value>;
}

impl PropertyMap for Map<String, Value> {
    type Value = Value;

    fn property(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn insert_property(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }

    fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.remove(key)
    }
}

impl<V: Clone> PropertyMap for BTreeMap<String, V> {
    type Value = V;

    fn property(&self, key: &str) -> Option<&V> {
        self.get(key)
    }

    fn insert_property(&mut self, key: String, value: V) {
        self.insert(key, value);
    }

    fn remove_property(&mut self, key: &str) -> Option<V> {
        self.remove(key)
    }
}

impl<V: Clone, S: BuildHasher + Clone> PropertyMap for HashMap<String, V, S> {
    type Value = V;

    fn property(&self, key: &str) -> Option<&V> {
        self.get(key)
    }

    fn insert_property(&mut self, key: String, value: V) {
        self.insert(key, value);
    }

    fn remove_property(&mut self, key: &str) -> Option<V> {
        self.remove(key)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What happened to one property during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The property was inserted or overwritten with a different value.
    Set,
    /// The property was present and has been deleted.
    Removed,
}

/// A property that actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyChange {
    pub property: String,
    pub kind: ChangeKind,
}

/// Summary of a batch update, in application order.
///
/// A property touched several times in one batch appears once, with the
/// kind of its last effective change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub changes: Vec<PropertyChange>,
    /// Whether the state was cloned. `false` means the input came back as-is.
    pub cloned: bool,
}

impl UpdateReport {
    /// Returns `true` if the update handed back the original state.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.cloned
    }

    /// Properties whose last effective change was a set.
    pub fn set_properties(&self) -> impl Iterator<Item = &str> {
        self.of_kind(ChangeKind::Set)
    }

    /// Properties whose last effective change was a removal.
    pub fn removed_properties(&self) -> impl Iterator<Item = &str> {
        self.of_kind(ChangeKind::Removed)
    }

    fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &str> {
        self.changes
            .iter()
            .filter(move |change| change.kind == kind)
            .map(|change| change.property.as_str())
    }

    fn record(&mut self, property: String, kind: ChangeKind) {
        self.changes.retain(|change| change.property != property);
        self.changes.push(PropertyChange { property, kind });
    }
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// Outcome of applying a single property to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Unchanged,
    Changed(ChangeKind),
}

/// Apply one property to a batch accumulator.
///
/// The accumulator starts borrowed. The first real change promotes it to an
/// owned clone; every later change writes into that clone.
fn apply_property<M, K>(acc: &mut Cow<'_, M>, property: K, value: Option<M::Value>) -> Applied
where
    M: PropertyMap,
    M::Value: DeepEq,
    K: AsRef<str> + Into<String>,
{
    match value {
        None => {
            let key = property.as_ref();
            if acc.property(key).is_none() {
                trace!(property = key, "absent property set to absent, skipping");
                return Applied::Unchanged;
            }
            promote(acc).remove_property(key);
            trace!(property = key, "property removed");
            Applied::Changed(ChangeKind::Removed)
        }
        Some(value) => {
            let unchanged = acc
                .property(property.as_ref())
                .is_some_and(|current| current.deep_eq(&value));
            if unchanged {
                trace!(property = property.as_ref(), "value deep-equal to current, skipping");
                return Applied::Unchanged;
            }
            let key: String = property.into();
            trace!(property = %key, "property set");
            promote(acc).insert_property(key, value);
            Applied::Changed(ChangeKind::Set)
        }
    }
}

/// Owned view of the accumulator, cloning the borrowed state on first use.
fn promote<'c, M: PropertyMap>(acc: &'c mut Cow<'_, M>) -> &'c mut M {
    if matches!(acc, Cow::Borrowed(_)) {
        debug!("first effective change, cloning state");
    }
    acc.to_mut()
}

/// Set a single property, copy-on-write.
///
/// `value: None` deletes the property if present. Returns the input
/// unchanged (borrowed) when the property already holds a deep-equal value
/// or is absent and asked to stay absent.
pub fn set<'a, M>(state: &'a M, property: &str, value: Option<M::Value>) -> Cow<'a, M>
where
    M: PropertyMap,
    M::Value: DeepEq,
{
    let mut acc = Cow::Borrowed(state);
    apply_property(&mut acc, property, value);
    acc
}

/// Apply a batch of property changes, copy-on-write.
///
/// Changes are applied in iteration order. The state is cloned at the first
/// change that has an effect and never again in the same call. When no
/// change has an effect the input is returned borrowed.
#[instrument(level = "debug", skip_all)]
pub fn assign<'a, M, I, K>(state: &'a M, changes: I) -> Cow<'a, M>
where
    M: PropertyMap,
    M::Value: DeepEq,
    I: IntoIterator<Item = (K, Option<M::Value>)>,
    K: AsRef<str> + Into<String>,
{
    let mut acc = Cow::Borrowed(state);
    for (property, value) in changes {
        apply_property(&mut acc, property, value);
    }
    acc
}

/// Like [`assign`], also reporting which properties changed.
#[instrument(level = "debug", skip_all)]
pub fn assign_with_report<'a, M, I, K>(state: &'a M, changes: I) -> (Cow<'a, M>, UpdateReport)
where
    M: PropertyMap,
    M::Value: DeepEq,
    I: IntoIterator<Item = (K, Option<M::Value>)>,
    K: AsRef<str> + Into<String>,
{
    let mut acc = Cow::Borrowed(state);
    let mut report = UpdateReport::default();
    for (property, value) in changes {
        let name = property.as_ref().to_owned();
        if let Applied::Changed(kind) = apply_property(&mut acc, property, value) {
            report.record(name, kind);
        }
    }
    report.cloned = matches!(acc, Cow::Owned(_));
    debug!(
        changed = report.changes.len(),
        cloned = report.cloned,
        "batch applied"
    );
    (acc, report)
}

// ---------------------------------------------------------------------------
// JSON value entry points
// ---------------------------------------------------------------------------

/// View a JSON value as [`State`], failing fast if it is not an object.
///
/// # Errors
///
/// Returns [`UpdateError::NotAnObject`] for any non-object value.
pub fn as_state(value: &Value) -> Result<&State, UpdateError> {
    value.as_object().ok_or(UpdateError::NotAnObject {
        found: json_kind(value),
    })
}

/// [`set`] over an arbitrary JSON value.
///
/// # Errors
///
/// Returns [`UpdateError::NotAnObject`] if `state` is not a JSON object.
pub fn set_value<'a>(
    state: &'a Value,
    property: &str,
    value: Option<Value>,
) -> Result<Cow<'a, Value>, UpdateError> {
    let map = as_state(state)?;
    Ok(rewrap(state, set(map, property, value)))
}

/// [`assign`] over an arbitrary JSON value.
///
/// # Errors
///
/// Returns [`UpdateError::NotAnObject`] if `state` is not a JSON object.
pub fn assign_value<'a, I, K>(state: &'a Value, changes: I) -> Result<Cow<'a, Value>, UpdateError>
where
    I: IntoIterator<Item = (K, Option<Value>)>,
    K: AsRef<str> + Into<String>,
{
    let map = as_state(state)?;
    Ok(rewrap(state, assign(map, changes)))
}

fn rewrap<'a>(original: &'a Value, updated: Cow<'a, State>) -> Cow<'a, Value> {
    match updated {
        Cow::Borrowed(_) => Cow::Borrowed(original),
        Cow::Owned(map) => Cow::Owned(Value::Object(map)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
