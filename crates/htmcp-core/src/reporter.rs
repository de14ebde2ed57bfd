//! Reporter trait for dependency injection
//!
//! This trait allows the install pipeline to report progress and status
//! without being coupled to a specific terminal implementation.

use crate::error::Stage;

pub trait Reporter: Send + Sync {
    /// A pipeline stage has started.
    fn stage(&self, stage: Stage, detail: &str);

    /// Updates the progress of the artifact download.
    fn downloading(&self, current: u64, total: Option<u64>);

    /// The binary is installed and passed its smoke test.
    fn done(&self, name: &str, version: &str, detail: &str);

    /// A stage failed; the run is about to abort.
    fn failed(&self, stage: Stage, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn stage(&self, stage: Stage, detail: &str) {
        (**self).stage(stage, detail)
    }
    fn downloading(&self, current: u64, total: Option<u64>) {
        (**self).downloading(current, total)
    }
    fn done(&self, name: &str, version: &str, detail: &str) {
        (**self).done(name, version, detail)
    }
    fn failed(&self, stage: Stage, reason: &str) {
        (**self).failed(stage, reason)
    }
    fn info(&self, msg: &str) {
        (**self).info(msg)
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg)
    }
}

/// A no-op reporter for silent operations (e.g., verification, testing).
#[derive(Clone, Copy, Debug)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn stage(&self, _: Stage, _: &str) {}
    fn downloading(&self, _: u64, _: Option<u64>) {}
    fn done(&self, _: &str, _: &str, _: &str) {}
    fn failed(&self, _: Stage, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
