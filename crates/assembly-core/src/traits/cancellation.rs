//! Stop requests for long-running spectrum estimation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A stop flag polled between surrogate trials.
///
/// Polling is cooperative: a trial already running finishes its mining
/// pass before the flag is seen.
pub trait Cancellable: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// Shared one-way stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of a clone to stop at its next trial boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// True when a token was supplied and has fired.
pub fn stop_requested<C: Cancellable + ?Sized>(token: Option<&C>) -> bool {
    token.is_some_and(|t| t.is_cancelled())
}
