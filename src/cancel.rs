use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PaletteError, Result};

/// Shared cancellation flag checked between the coarse phases of extraction
/// and rendering. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal every holder of this token to stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fail with `Cancelled` if the flag is set.
    pub fn check(&self, phase: &'static str) -> Result<()> {
        if self.is_cancelled() {
            log::debug!("cancellation observed during {phase}");
            return Err(PaletteError::Cancelled { phase });
        }
        Ok(())
    }
}
