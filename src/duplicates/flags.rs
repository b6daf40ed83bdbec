//! The duplicate-flag vector returned by the finder.

use std::ops::Index;

use serde::Serialize;

/// One boolean per original row, `true` where the row duplicates an
/// earlier row. Labelled [`DuplicateFlags::NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateFlags {
    flags: Vec<bool>,
}

impl DuplicateFlags {
    /// Label of the flag vector.
    pub const NAME: &'static str = "duplicates";

    /// Wrap a flag vector.
    #[must_use]
    pub fn new(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag of one row.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<bool> {
        self.flags.get(row).copied()
    }

    /// Flags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Iterate over flags in row order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().copied()
    }

    /// Number of rows flagged as duplicates.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Whether any row is flagged.
    #[must_use]
    pub fn any(&self) -> bool {
        self.flags.contains(&true)
    }

    /// Positions of the flagged rows, ascending.
    #[must_use]
    pub fn duplicate_rows(&self) -> Vec<usize> {
        self.positions(true)
    }

    /// Positions of the rows kept by keep-first deduplication, ascending.
    #[must_use]
    pub fn kept_rows(&self) -> Vec<usize> {
        self.positions(false)
    }

    /// Unwrap into the plain vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<bool> {
        self.flags
    }

    fn positions(&self, wanted: bool) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(row, &flag)| (flag == wanted).then_some(row))
            .collect()
    }
}

impl From<Vec<bool>> for DuplicateFlags {
    fn from(flags: Vec<bool>) -> Self {
        Self::new(flags)
    }
}

impl From<DuplicateFlags> for Vec<bool> {
    fn from(flags: DuplicateFlags) -> Self {
        flags.flags
    }
}

impl Index<usize> for DuplicateFlags {
    type Output = bool;

    fn index(&self, row: usize) -> &bool {
        &self.flags[row]
    }
}

impl PartialEq<Vec<bool>> for DuplicateFlags {
    fn eq(&self, other: &Vec<bool>) -> bool {
        &self.flags == other
    }
}

impl PartialEq<[bool]> for DuplicateFlags {
    fn eq(&self, other: &[bool]) -> bool {
        self.flags == other
    }
}

impl<const N: usize> PartialEq<[bool; N]> for DuplicateFlags {
    fn eq(&self, other: &[bool; N]) -> bool {
        self.flags == other
    }
}
