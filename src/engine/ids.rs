//! Monotonic identifier sequences.

/// Hands out `u64` ids that are never reused.
///
/// A sequence resumes after the highest id already present in a loaded
/// collection, and only ever moves forward, so ids of deleted entities are
/// not handed out again.
#[derive(Debug, Clone)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Starts after the largest of `existing`, or at 1 when empty.
    pub(crate) fn starting_after<I: IntoIterator<Item = u64>>(existing: I) -> Self {
        Self {
            next: existing.into_iter().max().map_or(1, |max| max + 1),
        }
    }

    /// Reserves and returns the next id.
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
