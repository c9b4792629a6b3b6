//! Progress notification for the apply and undo engines.
//!
//! Observers are called once per processed item, after the item's outcome is
//! settled. An observer error is never propagated: the engine logs it and
//! moves on to the next item, so a broken progress display can never stop a
//! rename run halfway.

use tracing::debug;

/// Receives `(current, total, item)` after each item, `current` starting at 1
pub trait ProgressObserver<T: ?Sized> {
    fn on_progress(&mut self, current: usize, total: usize, item: &T) -> anyhow::Result<()>;
}

impl<T: ?Sized, F> ProgressObserver<T> for F
where
    F: FnMut(usize, usize, &T) -> anyhow::Result<()>,
{
    fn on_progress(&mut self, current: usize, total: usize, item: &T) -> anyhow::Result<()> {
        self(current, total, item)
    }
}

/// Call the observer if there is one, dropping whatever error it returns
pub(crate) fn notify<T: ?Sized>(
    observer: &mut Option<&mut dyn ProgressObserver<T>>,
    current: usize,
    total: usize,
    item: &T,
) {
    if let Some(observer) = observer.as_deref_mut() {
        if let Err(e) = observer.on_progress(current, total, item) {
            debug!(current, total, error = %e, "Progress observer failed, continuing");
        }
    }
}
