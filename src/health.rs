//! Shared application health flag.
//!
//! The flag is an explicitly injected state cell: it is created once at
//! startup, handed to the router state, and toggled over HTTP. Readers
//! (the `/health` endpoint, and through it any orchestration probe) see
//! writes immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe "is the application down" cell.
///
/// Cloning shares the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct HealthState {
    is_app_down: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a new cell in the "up" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the application as down (or back up).
    pub fn set_app_down(&self, down: bool) {
        self.is_app_down.store(down, Ordering::SeqCst);
    }

    /// Whether the application has been marked down.
    pub fn is_app_down(&self) -> bool {
        self.is_app_down.load(Ordering::SeqCst)
    }
}
