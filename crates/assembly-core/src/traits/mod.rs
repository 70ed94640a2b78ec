//! Cross-cutting traits.

pub mod cancellation;

pub use cancellation::{stop_requested, Cancellable, CancellationToken};
