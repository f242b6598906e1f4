//! Normalizing state-holding inputs into a state value.
//!
//! Callers may hold state three ways: the value itself, a zero-argument
//! accessor, or a container (store) that owns the canonical state and exposes
//! `get_state` plus `dispatch`. [`Stateful`] names the three cases and
//! [`to_state`] reads the state out of any of them.
//!
//! Only types implementing [`StateContainer`] can be wrapped with
//! [`Stateful::container`]: a bare [`StateSource`] without `dispatch` is an
//! accessor, not a container.

use std::fmt;

/// Anything that can produce its current state on demand.
pub trait StateSource {
    type State;

    /// Snapshot of the current state.
    fn get_state(&self) -> Self::State;
}

/// A state owner that also accepts dispatched actions.
pub trait StateContainer: StateSource {
    type Action;

    /// Hand an action to the container.
    fn dispatch(&mut self, action: Self::Action);
}

/// A state-holding input.
pub enum Stateful<'a, S> {
    /// The state value itself.
    Direct(S),
    /// A zero-argument function returning the state.
    Accessor(Box<dyn FnOnce() -> S + 'a>),
    /// A container whose `get_state` yields the state.
    Container(ContainerRef<'a, S>),
}

/// A borrowed [`StateContainer`], viewed through its [`StateSource`] half.
///
/// Only [`Stateful::container`] can build one, so a bare source without
/// `dispatch` never ends up in [`Stateful::Container`]:
///
/// ```compile_fail
/// use cowstate_core::{ContainerRef, StateSource, Stateful};
///
/// struct NoDispatch;
///
/// impl StateSource for NoDispatch {
///     type State = i32;
///
///     fn get_state(&self) -> i32 {
///         7
///     }
/// }
///
/// let _ = Stateful::Container(ContainerRef(&NoDispatch));
/// ```
pub struct ContainerRef<'a, S>(&'a dyn StateSource<State = S>);

impl<S> ContainerRef<'_, S> {
    /// Current state of the wrapped container.
    #[must_use]
    pub fn get_state(&self) -> S {
        self.0.get_state()
    }
}

impl<'a, S> Stateful<'a, S> {
    /// Wrap a state value.
    #[must_use]
    pub const fn direct(state: S) -> Self {
        Self::Direct(state)
    }

    /// Wrap a zero-argument accessor.
    #[must_use]
    pub fn accessor(f: impl FnOnce() -> S + 'a) -> Self {
        Self::Accessor(Box::new(f))
    }

    /// Wrap a container exposing both `get_state` and `dispatch`.
    ///
    /// A type with `get_state` alone is rejected:
    ///
    /// ```compile_fail
    /// use cowstate_core::{StateSource, Stateful};
    ///
    /// struct NoDispatch;
    ///
    /// impl StateSource for NoDispatch {
    ///     type State = i32;
    ///
    ///     fn get_state(&self) -> i32 {
    ///         7
    ///     }
    /// }
    ///
    /// let _ = Stateful::container(&NoDispatch);
    /// ```
    #[must_use]
    pub fn container<C>(container: &'a C) -> Self
    where
        C: StateContainer<State = S> + 'a,
    {
        Self::Container(ContainerRef(container))
    }

    /// Read the state out of this input.
    pub fn into_state(self) -> S {
        match self {
            Self::Direct(state) => state,
            Self::Accessor(f) => f(),
            Self::Container(container) => container.get_state(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Stateful<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(state) => f.debug_tuple("Direct").field(state).finish(),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
            Self::Container(_) => f.write_str("Container(..)"),
        }
    }
}

/// Normalize a state-holding input into its state value.
///
/// A direct value is returned unchanged, including "empty" values such as
/// `None` or `Value::Null`.
pub fn to_state<S>(stateful: Stateful<'_, S>) -> S {
    stateful.into_state()
}
