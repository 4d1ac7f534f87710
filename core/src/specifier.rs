//! Option identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque option id used as the lookup key for options and parsed args.
///
/// Ids are plain integers chosen by the table author. Only positive ids are
/// valid; `0` and negative values never name an option.
///
/// # Examples
///
/// ```
/// use opt_table_core::OptSpecifier;
///
/// let id = OptSpecifier::new(3);
/// assert!(id.is_valid());
/// assert_eq!(id.id(), 3);
/// assert_eq!(id, OptSpecifier::from(3));
/// assert!(!OptSpecifier::new(0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptSpecifier(i32);

impl OptSpecifier {
    /// Wraps a raw id. Validity is checked when the owning table is built.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn id(self) -> i32 {
        self.0
    }

    /// Returns `true` for ids greater than zero.
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for OptSpecifier {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<OptSpecifier> for i32 {
    fn from(id: OptSpecifier) -> Self {
        id.0
    }
}

impl fmt::Display for OptSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One or more option ids accepted by the [`ArgumentList`](crate::ArgumentList)
/// queries.
///
/// Implemented for a single id (or raw `i32`), arrays, and slices so callers
/// can write `args.has_arg(VERBOSE)` as well as `args.has_arg([OUT, OUT_ALIAS])`.
pub trait OptIds {
    /// Returns `true` if `id` is one of the ids in this set.
    fn contains_id(&self, id: OptSpecifier) -> bool;
}

impl OptIds for OptSpecifier {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        *self == id
    }
}

impl OptIds for i32 {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        *self == id.id()
    }
}

impl<const N: usize> OptIds for [OptSpecifier; N] {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        self.contains(&id)
    }
}

impl<const N: usize> OptIds for [i32; N] {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        self.contains(&id.id())
    }
}

impl OptIds for &[OptSpecifier] {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        self.contains(&id)
    }
}

impl OptIds for Vec<OptSpecifier> {
    fn contains_id(&self, id: OptSpecifier) -> bool {
        self.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(OptSpecifier::new(1).is_valid());
        assert!(!OptSpecifier::new(0).is_valid());
        assert!(!OptSpecifier::new(-4).is_valid());
    }

    #[test]
    fn test_id_sets() {
        let id = OptSpecifier::new(2);
        assert!(id.contains_id(OptSpecifier::new(2)));
        assert!(2_i32.contains_id(id));
        assert!([1_i32, 2, 3].contains_id(id));
        assert!(![OptSpecifier::new(1)].contains_id(id));

        let ids = vec![OptSpecifier::new(5), id];
        assert!(ids.as_slice().contains_id(id));
        assert!(ids.contains_id(OptSpecifier::new(5)));
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&OptSpecifier::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: OptSpecifier = serde_json::from_str("7").unwrap();
        assert_eq!(back.id(), 7);
    }
}
