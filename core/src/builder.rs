//! Consuming builder for [`OptTable`].

use crate::{IntoPrefixes, OptSpecifier, OptTable, OptionDef, TableError};

/// Accumulates options in registration order and seals them into an
/// [`OptTable`].
///
/// [`build`](Self::build) consumes the builder. If no Unknown-kind option was
/// added, one is synthesized with an id one greater than the largest
/// registered id, so the matching loop always has a fallback.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptSpecifier, OptTableBuilder};
///
/// let table = OptTableBuilder::new()
///     .flag(1, "-", "verbose")
///     .joined(2, "-", "out=")
///     .build()
///     .unwrap();
///
/// assert_eq!(table.unknown_id(), OptSpecifier::new(3));
/// assert_eq!(table.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptTableBuilder {
    options: Vec<OptionDef>,
}

impl OptTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fully configured option.
    pub fn add(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }

    pub fn unknown(self, id: impl Into<OptSpecifier>) -> Self {
        self.add(OptionDef::unknown(id))
    }

    pub fn input(self, id: impl Into<OptSpecifier>) -> Self {
        self.add(OptionDef::input(id))
    }

    pub fn group(self, id: impl Into<OptSpecifier>, name: impl Into<String>) -> Self {
        self.add(OptionDef::group(id, name))
    }

    pub fn flag(self, id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        self.add(OptionDef::flag(id, prefixes, name))
    }

    pub fn joined(self, id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        self.add(OptionDef::joined(id, prefixes, name))
    }

    pub fn separate(self, id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        self.add(OptionDef::separate(id, prefixes, name))
    }

    pub fn joined_or_separate(
        self,
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
    ) -> Self {
        self.add(OptionDef::joined_or_separate(id, prefixes, name))
    }

    pub fn multi_arg(
        self,
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
        count: usize,
    ) -> Self {
        self.add(OptionDef::multi_arg(id, prefixes, name, count))
    }

    pub fn comma_joined(
        self,
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
    ) -> Self {
        self.add(OptionDef::comma_joined(id, prefixes, name))
    }

    pub fn remaining_args(
        self,
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
    ) -> Self {
        self.add(OptionDef::remaining_args(id, prefixes, name))
    }

    /// Number of options added so far.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Validates the accumulated options and returns the sealed table.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found. No table is produced on
    /// failure.
    pub fn build(self) -> Result<OptTable, TableError> {
        OptTable::new(self.options)
    }
}

impl Extend<OptionDef> for OptTableBuilder {
    fn extend<I: IntoIterator<Item = OptionDef>>(&mut self, iter: I) {
        self.options.extend(iter);
    }
}

impl FromIterator<OptionDef> for OptTableBuilder {
    fn from_iter<I: IntoIterator<Item = OptionDef>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}
