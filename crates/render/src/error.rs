use std::time::Duration;

/// Errors from the frame loop. All of them are fatal to the render loop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(
        "timed out after {timeout:?} waiting for fence value {value} (completed {completed})"
    )]
    FenceTimeout {
        value: u64,
        completed: u64,
        timeout: Duration,
    },
    #[error("fence value {value} was never signalled (last signalled {signalled})")]
    FenceNeverSignalled { value: u64, signalled: u64 },
    #[error("fence values must increase: signalled {value} after {previous}")]
    FenceNotMonotonic { value: u64, previous: u64 },
    #[error("{buffer} slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange {
        buffer: &'static str,
        index: usize,
        capacity: usize,
    },
    #[error("frame ring needs at least one slot")]
    EmptyRing,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("backend error: {0}")]
    Backend(String),
}
