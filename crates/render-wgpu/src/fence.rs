use rubix_render::{Fence, FrameError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_micros(200);

/// Fence built on queue completion callbacks.
///
/// `signal(v)` registers an `on_submitted_work_done` callback that raises the
/// completed counter to `v` once everything submitted so far has finished.
/// Callbacks only run while the device is polled, so `wait_for` polls until
/// the value is reached or the deadline passes.
pub struct WgpuFence {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    completed: Arc<AtomicU64>,
    signalled: u64,
}

impl WgpuFence {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            completed: Arc::new(AtomicU64::new(0)),
            signalled: 0,
        }
    }

    pub fn signalled_value(&self) -> u64 {
        self.signalled
    }
}

impl Fence for WgpuFence {
    fn completed_value(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    fn signal(&mut self, value: u64) -> Result<(), FrameError> {
        if value <= self.signalled {
            return Err(FrameError::FenceNotMonotonic {
                value,
                previous: self.signalled,
            });
        }
        let completed = Arc::clone(&self.completed);
        self.queue.on_submitted_work_done(move || {
            completed.fetch_max(value, Ordering::AcqRel);
        });
        self.signalled = value;
        Ok(())
    }

    fn wait_for(&mut self, value: u64, timeout: Duration) -> Result<(), FrameError> {
        if value > self.signalled {
            return Err(FrameError::FenceNeverSignalled {
                value,
                signalled: self.signalled,
            });
        }
        let deadline = Instant::now() + timeout;
        loop {
            let _ = self.device.poll(wgpu::Maintain::Poll);
            let completed = self.completed_value();
            if completed >= value {
                return Ok(());
            }
            if Instant::now() >= deadline {
                tracing::error!(
                    "fence {value} not reached within {timeout:?} (completed {completed})"
                );
                return Err(FrameError::FenceTimeout {
                    value,
                    completed,
                    timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}
