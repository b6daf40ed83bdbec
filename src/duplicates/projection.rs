//! Result projection (stage 4).

/// Map per-candidate flags back onto the full table.
///
/// `sorted[i]` is the original row position of the candidate whose flag is
/// `flags[i]`. Rows that never became candidates stay `false`. The result
/// has exactly `total_rows` entries in original row order.
///
/// # Example
///
/// ```
/// use tabdupe::duplicates::project_flags;
///
/// let flags = project_flags(&[3, 0, 4], &[false, true, true], 5);
/// assert_eq!(flags, vec![true, false, false, false, true]);
/// ```
#[must_use]
pub fn project_flags(sorted: &[usize], flags: &[bool], total_rows: usize) -> Vec<bool> {
    debug_assert_eq!(
        sorted.len(),
        flags.len(),
        "{} candidates but {} flags",
        sorted.len(),
        flags.len()
    );

    let mut projected = vec![false; total_rows];
    for (&row, &flag) in sorted.iter().zip(flags) {
        projected[row] = flag;
    }
    projected
}
