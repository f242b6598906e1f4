//! Deep (structural) equality.
//!
//! [`DeepEq`] decides whether two values are semantically identical,
//! recursing into mappings and sequences instead of comparing references.
//! The updater uses it to tell a real change from a write of an equal value.
//!
//! # Rules
//!
//! - Mappings: same key set, pairwise deep-equal values. Key order is ignored.
//! - Sequences: same length, pairwise deep-equal elements in order.
//! - Numbers: compared by numeric value, so `1` and `1.0` are equal. Two
//!   integers compare exactly even when one is stored signed and the other
//!   unsigned. An integer equals a float only if the float is integral and
//!   names that exact integer; the integer is never rounded to `f64`, which
//!   keeps equality transitive above 2^53.
//! - Different type categories are never equal (`1` is not `"1"`).
//!
//! Two references to the same value short-circuit to `true` before any
//! recursion.

use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Structural equality that looks through nested containers.
pub trait DeepEq {
    /// Returns `true` if `self` and `other` are structurally equivalent.
    fn deep_eq(&self, other: &Self) -> bool;
}

/// Deep equality for two JSON values.
#[must_use]
pub fn equals(a: &Value, b: &Value) -> bool {
    a.deep_eq(b)
}

impl DeepEq for Value {
    fn deep_eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.as_slice().deep_eq(b.as_slice()),
            (Self::Object(a), Self::Object(b)) => a.deep_eq(b),
            _ => false,
        }
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.as_f64().filter(|_| a.is_f64()), b.as_f64().filter(|_| b.is_f64())) {
        (Some(x), Some(y)) => x == y,
        (Some(x), None) => integer_equals_float(b, x),
        (None, Some(y)) => integer_equals_float(a, y),
        (None, None) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            // Integers on opposite sides of the i64/u64 split can't be equal.
            _ => a.as_u64().is_some_and(|x| b.as_u64() == Some(x)),
        },
    }
}

/// Exact integer/float comparison, never rounding the integer through `f64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn integer_equals_float(int: &Number, float: f64) -> bool {
    // 2^63 and 2^64 are exactly representable; the ranges below are half-open.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    const U64_END: f64 = 18_446_744_073_709_551_616.0;

    if !float.is_finite() || float.fract() != 0.0 {
        return false;
    }
    if let Some(i) = int.as_i64() {
        return (-I64_END..I64_END).contains(&float) && float as i64 == i;
    }
    int.as_u64()
        .is_some_and(|u| (0.0..U64_END).contains(&float) && float as u64 == u)
}

impl DeepEq for Map<String, Value> {
    fn deep_eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value.deep_eq(theirs)))
    }
}

impl<T: DeepEq> DeepEq for [T] {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.deep_eq(b))
    }
}

impl<T: DeepEq> DeepEq for Vec<T> {
    fn deep_eq(&self, other: &Self) -> bool {
        self.as_slice().deep_eq(other.as_slice())
    }
}

impl<T: DeepEq> DeepEq for Option<T> {
    fn deep_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.deep_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: DeepEq + ?Sized> DeepEq for Box<T> {
    fn deep_eq(&self, other: &Self) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<T: DeepEq> DeepEq for BTreeMap<String, T> {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value.deep_eq(theirs)))
    }
}

impl<T: DeepEq, S: BuildHasher> DeepEq for HashMap<String, T, S> {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value.deep_eq(theirs)))
    }
}

/// Scalars have no structure to recurse into; `PartialEq` is the answer.
macro_rules! scalar_deep_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepEq for $ty {
                #[allow(clippy::float_cmp)]
                fn deep_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

scalar_deep_eq!(
    (), bool, char, String, str, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);
