use std::cmp::max;

/// Number of blocks re-scanned behind the last recorded event at boot.
///
/// This is a tolerance for short chain re-organizations, not a proof of
/// finality. Chains with slower finality need a larger margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReorgSafetyMargin {
    value: u64,
}

impl Default for ReorgSafetyMargin {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ReorgSafetyMargin {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Never goes below `start_block_number`, nor below zero.
    pub fn deduct_from(&self, block_number: u64, start_block_number: u64) -> u64 {
        max(start_block_number, block_number.saturating_sub(self.value))
    }
}
