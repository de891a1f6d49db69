//! Bounded history of recently seen inbound correlation ids.

/// Number of correlation ids the history retains.
pub const DEDUP_HISTORY_LEN: usize = 20;

/// Fixed-size ring of the last [`DEDUP_HISTORY_LEN`] correlation ids.
///
/// 0 marks a never-written slot, which is why 0 is never assigned to real
/// traffic (see `CORRELATION_NONE`). Membership is a linear scan of the
/// whole buffer; an id re-seen after 20 other distinct ids have cycled
/// through is treated as new.
#[derive(Debug, Clone)]
pub struct DedupHistory {
    seen: [u32; DEDUP_HISTORY_LEN],
    cursor: usize,
}

impl Default for DedupHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            seen: [0; DEDUP_HISTORY_LEN],
            cursor: 0,
        }
    }

    /// Whether the id has been recorded within the retained window
    pub fn contains(&self, correlation_id: u32) -> bool {
        self.seen.iter().any(|&id| id == correlation_id)
    }

    /// Record an id, overwriting the oldest entry once the ring is full
    pub fn record(&mut self, correlation_id: u32) {
        self.seen[self.cursor] = correlation_id;
        self.cursor = (self.cursor + 1) % DEDUP_HISTORY_LEN;
    }
}
