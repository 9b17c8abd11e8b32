//! Per-run stop signalling for [`Chain::process_with_stop`](crate::Chain::process_with_stop).

use crate::error::BoxError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle passed to every middleware during a signal-stopped run.
///
/// A fresh handle is created for each call to
/// [`Chain::process_with_stop`](crate::Chain::process_with_stop), so
/// concurrent runs over the same chain never interfere with each other's
/// stopping decisions. The handle is cheap to clone; clones share state.
///
/// Calling [`signal`](StopHandle::signal) marks the run as stopped: the
/// chain finishes the currently running middleware and resolves `false`.
/// Calling [`signal_error`](StopHandle::signal_error) additionally records
/// an error, which the chain surfaces to its caller once the middleware
/// has finished.
///
/// # Examples
///
/// ```
/// use kusari::StopHandle;
///
/// let stop = StopHandle::new();
/// assert!(!stop.is_signaled());
///
/// stop.signal();
/// assert!(stop.is_signaled());
/// ```
#[derive(Clone, Default)]
pub struct StopHandle {
    inner: Arc<Mutex<StopState>>,
}

#[derive(Default)]
struct StopState {
    signaled: bool,
    error: Option<BoxError>,
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("StopHandle")
            .field("signaled", &state.signaled)
            .field("has_error", &state.error.is_some())
            .finish()
    }
}

impl StopHandle {
    /// Creates a new, unsignaled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the run as stopped.
    ///
    /// The middleware currently executing is allowed to finish; no
    /// middleware after it runs.
    pub fn signal(&self) {
        self.state().signaled = true;
    }

    /// Marks the run as stopped and records `error`.
    ///
    /// The error is not raised inside the middleware; it propagates out of
    /// the execution call after the middleware has finished. If called more
    /// than once, the last error wins.
    pub fn signal_error(&self, error: impl Into<BoxError>) {
        let mut state = self.state();
        state.signaled = true;
        state.error = Some(error.into());
    }

    /// Returns `true` if the run has been stopped.
    pub fn is_signaled(&self) -> bool {
        self.state().signaled
    }

    pub(crate) fn take_error(&self) -> Option<BoxError> {
        self.state().error.take()
    }

    fn state(&self) -> MutexGuard<'_, StopState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
