//! One-shot activation latch.
//!
//! The gate starts closed. [`ActivationGate::closed`] hands out the only
//! [`GateTrigger`]; opening consumes it, so the gate opens at most once and
//! there is no way to close it again. Readers hold cloneable
//! [`ActivationGate`] handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ActivationGate {
    open: Arc<AtomicBool>,
}

/// The single writer of an [`ActivationGate`].
#[derive(Debug)]
pub struct GateTrigger {
    open: Arc<AtomicBool>,
}

impl ActivationGate {
    /// Create a closed gate and its trigger.
    pub fn closed() -> (Self, GateTrigger) {
        let open = Arc::new(AtomicBool::new(false));
        (
            Self { open: open.clone() },
            GateTrigger { open },
        )
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl GateTrigger {
    /// Open the gate for good.
    pub fn open(self) {
        self.open.store(true, Ordering::SeqCst);
        tracing::info!("Activation gate opened");
    }
}
