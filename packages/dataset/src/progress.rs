//! Progress reporting for dataset loading.
//!
//! The loader reports how many bytes of the input file it has consumed
//! through [`ProgressCallback`], leaving the rendering (a terminal bar,
//! nothing at all) to the caller.

use std::sync::Arc;

/// Receives progress updates while a dataset is read.
///
/// Implementations must be `Send + Sync` so a single instance can be
/// shared behind an [`Arc`].
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (bytes of input).
    fn set_total(&self, total: u64);

    /// Set the current position (absolute, not delta).
    fn set_position(&self, pos: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
