//! Request generations
//!
//! Every refresh advances a counter and tags its request with the new value.
//! A response is applied only while its tag is still the current value.

/// Monotonic refresh counter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// Move to the next generation and return it
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn is_current(&self, tag: u64) -> bool {
        self.0 == tag
    }
}

/// Outcome of applying a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// State was updated
    Updated,
    /// Result belonged to an older generation and was dropped
    Stale,
}
