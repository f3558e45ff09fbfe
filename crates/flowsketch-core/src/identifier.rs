//! Identifier management using string interning.
//!
//! Node and edge identifiers come from untrusted AI output and are compared
//! constantly while validating and laying out a graph. The [`Id`] type interns
//! them once so that equality, hashing and copying are all cheap.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// Interned identifier for flowchart nodes and edges.
///
/// # Examples
///
/// ```
/// use flowsketch_core::identifier::Id;
///
/// let start = Id::new("1");
/// let edge = Id::new("e1-2");
///
/// assert_eq!(start, "1");
/// assert_eq!(edge.to_string(), "e1-2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it on first use.
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("Failed to acquire interner lock");
        Self(interner.get_or_intern(name))
    }

    /// Creates an `Id` by appending `-{suffix}` to this identifier.
    ///
    /// Used when a synthesized identifier collides with an existing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::identifier::Id;
    ///
    /// let id = Id::new("e1-2");
    /// assert_eq!(id.with_suffix(2), "e1-2-2");
    /// ```
    pub fn with_suffix(self, suffix: usize) -> Self {
        let name = format!("{self}-{suffix}");
        Self::new(&name)
    }

    /// Runs `f` with the string this identifier was created from.
    fn with_str<R>(self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Copy out before formatting so the lock is not held across user writers.
        let value = self.with_str(|value| value.to_owned());
        f.write_str(&value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|value| value == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
