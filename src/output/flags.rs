//! Plain flag output: one `true`/`false` per line, in row order.

use std::io;

use crate::duplicates::DuplicateFlags;

/// Line-per-row flag formatter.
pub struct FlagsOutput<'a> {
    flags: &'a DuplicateFlags,
}

impl<'a> FlagsOutput<'a> {
    /// Create a new flag formatter.
    #[must_use]
    pub fn new(flags: &'a DuplicateFlags) -> Self {
        Self { flags }
    }

    /// Write the flags to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for flag in self.flags.iter() {
            writeln!(writer, "{flag}")?;
        }
        writer.flush()
    }
}
