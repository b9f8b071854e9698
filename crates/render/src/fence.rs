//! CPU/GPU fence abstraction.

use crate::error::FrameError;
use std::collections::VecDeque;
use std::time::Duration;

/// A monotonically increasing counter the GPU advances as it retires work.
///
/// `signal` enqueues a GPU-side write of `value` behind everything already
/// submitted; `wait_for` blocks the calling thread until the completed value
/// reaches `value` or the timeout expires.
pub trait Fence {
    fn completed_value(&self) -> u64;

    fn signal(&mut self, value: u64) -> Result<(), FrameError>;

    fn wait_for(&mut self, value: u64, timeout: Duration) -> Result<(), FrameError>;
}

/// In-process fence for headless runs and tests.
///
/// Signals queue up as pending; the simulated GPU retires them in order
/// either when told to (`advance`, `retire_through`) or when the CPU blocks on
/// one in `wait_for`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFence {
    completed: u64,
    signalled: u64,
    pending: VecDeque<u64>,
    waits: u64,
    /// When set, `wait_for` refuses to retire work and times out instead.
    pub stalled: bool,
}

impl SimulatedFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retire up to `count` pending signals.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            match self.pending.pop_front() {
                Some(value) => self.completed = value,
                None => break,
            }
        }
    }

    /// Retire every pending signal up to and including `value`.
    pub fn retire_through(&mut self, value: u64) {
        while let Some(&next) = self.pending.front() {
            if next > value {
                break;
            }
            self.completed = next;
            self.pending.pop_front();
        }
    }

    pub fn signalled_value(&self) -> u64 {
        self.signalled
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of `wait_for` calls that actually had to block.
    pub fn waits(&self) -> u64 {
        self.waits
    }
}

impl Fence for SimulatedFence {
    fn completed_value(&self) -> u64 {
        self.completed
    }

    fn signal(&mut self, value: u64) -> Result<(), FrameError> {
        if value <= self.signalled {
            return Err(FrameError::FenceNotMonotonic {
                value,
                previous: self.signalled,
            });
        }
        self.signalled = value;
        self.pending.push_back(value);
        Ok(())
    }

    fn wait_for(&mut self, value: u64, timeout: Duration) -> Result<(), FrameError> {
        if self.completed >= value {
            return Ok(());
        }
        if value > self.signalled {
            return Err(FrameError::FenceNeverSignalled {
                value,
                signalled: self.signalled,
            });
        }
        self.waits += 1;
        if self.stalled {
            return Err(FrameError::FenceTimeout {
                value,
                completed: self.completed,
                timeout,
            });
        }
        self.retire_through(value);
        Ok(())
    }
}
