//! Channel configuration for dispatcher communication

/// Channel buffer configuration for dispatcher communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Outcome channel buffer size (workers -> driver)
    pub outcome_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            outcome_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom outcome buffer size
    pub fn with_outcome_buffer(mut self, size: usize) -> Self {
        self.outcome_buffer = size.max(1);
        self
    }
}
