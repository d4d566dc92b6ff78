//! Lifecycle shared by every component that listens to the OS

use crate::error::Result;

/// A component that translates OS callbacks into router emissions
///
/// `start` attaches to the OS surface and `stop` detaches from it. Both are
/// idempotent: starting a running observer or stopping a stopped one does
/// nothing.
pub trait Observer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn start(&self) -> Result<()>;

    fn stop(&self);

    fn is_running(&self) -> bool;
}
