//! cowstate-core library.
//!
//! Copy-on-write updates for map-shaped state: [`assign`] and [`set`] hand
//! back the caller's state untouched (a borrowed [`Cow`](std::borrow::Cow))
//! when nothing actually changes, and clone it at most once otherwise.
//!
//! # Conventions
//!
//! - **Errors**: typed [`UpdateError`] in the library, `anyhow::Result` for
//!   configuration loading.
//! - **Logging**: `tracing` macros (`debug!`, `trace!`); the library never
//!   installs a subscriber.

pub mod changes;
pub mod config;
pub mod equality;
pub mod error;
pub mod stateful;
pub mod update;

pub use changes::ChangeSet;
pub use equality::{DeepEq, equals};
pub use error::{ErrorCode, UpdateError};
pub use stateful::{ContainerRef, StateContainer, StateSource, Stateful, to_state};
pub use update::{
    ChangeKind, PropertyChange, PropertyMap, State, UpdateReport, as_state, assign,
    assign_value, assign_with_report, set, set_value,
};
