//! Ring of per-frame resources gated by a fence.
//!
//! The CPU records frame `n` into slot `n % depth` while the GPU may still be
//! consuming the other slots. Before a slot is reused, the ring waits until
//! the GPU has passed the fence value stored when that slot was last
//! submitted, so a slot's buffers are never rewritten while in flight.

use crate::error::FrameError;
use crate::fence::Fence;
use std::time::Duration;

/// One slot of the ring: a resource plus the fence value of its last
/// submission (0 if never submitted).
#[derive(Debug)]
pub struct FrameSlot<R> {
    pub resource: R,
    fence_value: u64,
}

impl<R> FrameSlot<R> {
    pub fn fence_value(&self) -> u64 {
        self.fence_value
    }
}

#[derive(Debug)]
pub struct FrameRing<R> {
    slots: Vec<FrameSlot<R>>,
    current: usize,
    fence_counter: u64,
    timeout: Duration,
    stalls: u64,
}

impl<R> FrameRing<R> {
    /// Build a ring of `depth` slots, constructing each resource in order.
    pub fn from_fn(
        depth: usize,
        timeout: Duration,
        mut make: impl FnMut(usize) -> Result<R, FrameError>,
    ) -> Result<Self, FrameError> {
        if depth == 0 {
            return Err(FrameError::EmptyRing);
        }
        let slots = (0..depth)
            .map(|i| {
                Ok(FrameSlot {
                    resource: make(i)?,
                    fence_value: 0,
                })
            })
            .collect::<Result<Vec<_>, FrameError>>()?;
        Ok(Self {
            slots,
            current: 0,
            fence_counter: 0,
            timeout,
            stalls: 0,
        })
    }

    /// Advance to the next slot and block until the GPU has finished with it.
    ///
    /// The first call after construction lands on slot 1.
    pub fn acquire<F: Fence>(&mut self, fence: &mut F) -> Result<usize, FrameError> {
        self.current = (self.current + 1) % self.slots.len();
        let pending = self.slots[self.current].fence_value;
        if pending != 0 && fence.completed_value() < pending {
            tracing::trace!(
                "slot {} waiting on fence {pending} (completed {})",
                self.current,
                fence.completed_value()
            );
            self.stalls += 1;
            fence.wait_for(pending, self.timeout)?;
        }
        Ok(self.current)
    }

    /// Stamp the current slot with a fresh fence value and enqueue the GPU
    /// signal. Call after the slot's commands are submitted.
    pub fn signal<F: Fence>(&mut self, fence: &mut F) -> Result<u64, FrameError> {
        self.fence_counter += 1;
        let value = self.fence_counter;
        self.slots[self.current].fence_value = value;
        fence.signal(value)?;
        Ok(value)
    }

    /// Block until every submitted frame has retired.
    pub fn flush<F: Fence>(&mut self, fence: &mut F) -> Result<(), FrameError> {
        if self.fence_counter > 0 && fence.completed_value() < self.fence_counter {
            fence.wait_for(self.fence_counter, self.timeout)?;
        }
        Ok(())
    }

    pub fn current(&self) -> &R {
        &self.slots[self.current].resource
    }

    pub fn current_mut(&mut self) -> &mut R {
        &mut self.slots[self.current].resource
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot<R>> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> impl Iterator<Item = &FrameSlot<R>> {
        self.slots.iter()
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Last fence value handed out.
    pub fn fence_counter(&self) -> u64 {
        self.fence_counter
    }

    /// Number of acquires that had to wait on the GPU.
    pub fn stalls(&self) -> u64 {
        self.stalls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::SimulatedFence;

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn ring(depth: usize) -> FrameRing<usize> {
        FrameRing::from_fn(depth, TIMEOUT, Ok).unwrap()
    }

    #[test]
    fn empty_ring_is_rejected() {
        assert!(matches!(
            FrameRing::<usize>::from_fn(0, TIMEOUT, Ok),
            Err(FrameError::EmptyRing)
        ));
    }

    #[test]
    fn slots_cycle_starting_at_one() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        let order: Vec<usize> = (0..6)
            .map(|_| {
                let slot = ring.acquire(&mut fence).unwrap();
                ring.signal(&mut fence).unwrap();
                slot
            })
            .collect();
        assert_eq!(order, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn first_lap_never_waits() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        for _ in 0..3 {
            ring.acquire(&mut fence).unwrap();
            ring.signal(&mut fence).unwrap();
        }
        assert_eq!(ring.stalls(), 0);
        assert_eq!(fence.completed_value(), 0);
    }

    #[test]
    fn reuse_waits_for_the_slot_fence() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        for _ in 0..3 {
            ring.acquire(&mut fence).unwrap();
            ring.signal(&mut fence).unwrap();
        }
        // Slot 1 was stamped with fence 1; reusing it must retire that first.
        let slot = ring.acquire(&mut fence).unwrap();
        assert_eq!(slot, 1);
        assert_eq!(ring.stalls(), 1);
        assert!(fence.completed_value() >= ring.slot(1).unwrap().fence_value());
        assert_eq!(fence.completed_value(), 1);
    }

    #[test]
    fn no_wait_when_gpu_is_ahead() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        for _ in 0..10 {
            ring.acquire(&mut fence).unwrap();
            ring.signal(&mut fence).unwrap();
            fence.advance(1);
        }
        assert_eq!(ring.stalls(), 0);
    }

    #[test]
    fn signal_values_increase() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        let mut last = 0;
        for _ in 0..7 {
            ring.acquire(&mut fence).unwrap();
            let v = ring.signal(&mut fence).unwrap();
            assert!(v > last);
            last = v;
        }
        assert_eq!(ring.fence_counter(), 7);
    }

    #[test]
    fn timeout_is_fatal() {
        let mut ring = ring(2);
        let mut fence = SimulatedFence::new();
        for _ in 0..2 {
            ring.acquire(&mut fence).unwrap();
            ring.signal(&mut fence).unwrap();
        }
        fence.stalled = true;
        let err = ring.acquire(&mut fence).unwrap_err();
        assert!(matches!(err, FrameError::FenceTimeout { .. }));
    }

    #[test]
    fn flush_drains_everything() {
        let mut ring = ring(3);
        let mut fence = SimulatedFence::new();
        for _ in 0..5 {
            ring.acquire(&mut fence).unwrap();
            ring.signal(&mut fence).unwrap();
        }
        ring.flush(&mut fence).unwrap();
        assert_eq!(fence.completed_value(), 5);
        assert_eq!(fence.pending(), 0);
    }
}
