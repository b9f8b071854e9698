use rubix_common::FRAME_RESOURCE_COUNT;

/// Number of frame slots that still hold a stale copy of some CPU value.
///
/// Any mutation resets the counter to the ring depth. Each frame that copies
/// the value into its slot's constant buffer consumes one count, so the value
/// converges across every slot after exactly `FRAME_RESOURCE_COUNT` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyCounter(usize);

impl Default for DirtyCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyCounter {
    /// A fresh value is stale in every slot.
    pub fn new() -> Self {
        Self(FRAME_RESOURCE_COUNT)
    }

    pub fn clean() -> Self {
        Self(0)
    }

    pub fn mark(&mut self) {
        self.0 = FRAME_RESOURCE_COUNT;
    }

    pub fn is_dirty(self) -> bool {
        self.0 > 0
    }

    pub fn remaining(self) -> usize {
        self.0
    }

    /// Record one slot as updated. Returns whether a copy was due.
    pub fn consume(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_after_ring_depth() {
        let mut d = DirtyCounter::new();
        for _ in 0..FRAME_RESOURCE_COUNT {
            assert!(d.consume());
        }
        assert!(!d.is_dirty());
        assert!(!d.consume());
    }

    #[test]
    fn mark_resets_to_ring_depth() {
        let mut d = DirtyCounter::new();
        d.consume();
        d.mark();
        assert_eq!(d.remaining(), FRAME_RESOURCE_COUNT);
        assert_eq!(DirtyCounter::clean().remaining(), 0);
    }
}
