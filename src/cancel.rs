use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Best-effort cancellation for multi-frame operations.
///
/// The flag is checked between frames, never inside a backend call. Clones share
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
