use crate::error::ChainError;
use crate::middleware::{DynMiddleware, Flow, Middleware};
use crate::stop::StopHandle;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where [`Chain::insert_relative`] places candidates relative to the
/// anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Immediately before each anchor occurrence.
    Before,
    /// Immediately after each anchor occurrence.
    After,
}

/// Which execution protocol [`Chain::wrap`] gates the downstream call with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gate with [`Chain::process`].
    Process,
    /// Gate with [`Chain::process_with_stop`].
    ProcessWithStop,
}

type Validator<C> = Box<dyn Fn(&dyn Middleware<C>) -> bool + Send + Sync>;

/// An ordered chain of middlewares executed strictly one after another.
///
/// The chain owns its sequence; duplicates are permitted and insertion
/// order is execution order. Mutation methods take `&self`, so a chain
/// shared through an `Arc` can be grown, shrunk, or executed from several
/// tasks (and even from inside a running middleware).
///
/// The sequence is a live view during execution: the chain re-reads the
/// current index on every iteration rather than snapshotting, so a
/// mutation made mid-run is observed immediately by the run in progress.
/// Concurrent execution calls interleave at awaited-middleware
/// granularity; each call owns its own [`StopHandle`].
///
/// # Examples
///
/// ```
/// use kusari::prelude::*;
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Greet;
///
/// #[async_trait]
/// impl Middleware<Vec<String>> for Greet {
///     async fn handle(&self, log: &mut Vec<String>) -> Flow {
///         log.push("hello".to_string());
///         Flow::Continue
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), kusari::ChainError> {
/// let chain = Chain::new();
/// chain.append([Arc::new(Greet) as DynMiddleware<Vec<String>>])?;
///
/// let mut log = Vec::new();
/// assert!(chain.process(&mut log).await);
/// assert_eq!(log, vec!["hello".to_string()]);
/// # Ok(())
/// # }
/// ```
pub struct Chain<C: Send + 'static> {
    steps: Mutex<Vec<DynMiddleware<C>>>,
    validator: Validator<C>,
}

impl<C: Send + 'static> fmt::Debug for Chain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("steps", &self.names()).finish()
    }
}

impl<C: Send + 'static> Default for Chain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + 'static> Chain<C> {
    /// Creates an empty chain that accepts every middleware.
    pub fn new() -> Self {
        Self::with_validator(|_| true)
    }

    /// Creates an empty chain with a custom validity predicate.
    ///
    /// Every candidate handed to a mutation method is checked against
    /// `validator` before it is applied; a rejected candidate fails the
    /// call with [`ChainError::NotRunnable`]. Validity is checked only at
    /// insertion time, never again.
    pub fn with_validator<V>(validator: V) -> Self
    where
        V: Fn(&dyn Middleware<C>) -> bool + Send + Sync + 'static,
    {
        Self {
            steps: Mutex::new(Vec::new()),
            validator: Box::new(validator),
        }
    }

    /// Appends each candidate to the end of the chain, in argument order.
    ///
    /// Validation and application are interleaved left to right: when a
    /// candidate is rejected, the candidates before it stay appended and
    /// the rest of the call is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NotRunnable`] for the first rejected
    /// candidate.
    pub fn append<I>(&self, candidates: I) -> Result<(), ChainError>
    where
        I: IntoIterator<Item = DynMiddleware<C>>,
    {
        for candidate in candidates {
            self.ensure_runnable(&candidate)?;
            self.lock().push(candidate);
        }
        Ok(())
    }

    /// Inserts each candidate at the head of the chain.
    ///
    /// The caller's argument order is the final order at the head:
    /// prepending `[p, q]` onto `[x, y]` yields `[p, q, x, y]`.
    /// Validation is interleaved per candidate, as in [`append`].
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NotRunnable`] for the first rejected
    /// candidate.
    ///
    /// [`append`]: Chain::append
    pub fn prepend<I>(&self, candidates: I) -> Result<(), ChainError>
    where
        I: IntoIterator<Item = DynMiddleware<C>>,
    {
        let mut at = 0;
        for candidate in candidates {
            self.ensure_runnable(&candidate)?;
            self.lock().insert(at, candidate);
            at += 1;
        }
        Ok(())
    }

    /// Removes every occurrence of each candidate from the chain.
    ///
    /// Occurrences are matched by `Arc` pointer equality. Removing a value
    /// that is not in the chain is a no-op, not an error; the relative
    /// order of the remaining middlewares is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NotRunnable`] for the first rejected
    /// candidate.
    pub fn remove<I>(&self, candidates: I) -> Result<(), ChainError>
    where
        I: IntoIterator<Item = DynMiddleware<C>>,
    {
        for candidate in candidates {
            self.ensure_runnable(&candidate)?;
            self.lock().retain(|step| !Arc::ptr_eq(step, &candidate));
        }
        Ok(())
    }

    /// Inserts each candidate adjacent to every occurrence of `anchor`.
    ///
    /// With [`Position::Before`] the candidate lands immediately before
    /// each anchor occurrence, with [`Position::After`] immediately after.
    /// An anchor present twice receives two copies of each candidate. If
    /// the anchor is not in the chain, nothing is inserted.
    ///
    /// The scan advances past each insertion, so a freshly inserted
    /// element is never re-matched as an anchor even when the candidate
    /// is the anchor itself.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NotRunnable`] for the first rejected
    /// candidate.
    pub fn insert_relative<I>(
        &self,
        anchor: &DynMiddleware<C>,
        candidates: I,
        position: Position,
    ) -> Result<(), ChainError>
    where
        I: IntoIterator<Item = DynMiddleware<C>>,
    {
        for candidate in candidates {
            self.ensure_runnable(&candidate)?;
            let mut steps = self.lock();
            let mut index = 0;
            while index < steps.len() {
                if Arc::ptr_eq(&steps[index], anchor) {
                    match position {
                        Position::Before => steps.insert(index, Arc::clone(&candidate)),
                        Position::After => steps.insert(index + 1, Arc::clone(&candidate)),
                    }
                    // skip the pair of anchor + inserted element
                    index += 2;
                } else {
                    index += 1;
                }
            }
        }
        Ok(())
    }

    /// Removes all middlewares from the chain.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Returns the number of stored middlewares.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the chain holds no middlewares.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the names of the stored middlewares, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(|step| step.name()).collect()
    }

    /// Runs the chain until a middleware returns [`Flow::Halt`].
    ///
    /// Each middleware's [`handle`](Middleware::handle) is awaited to
    /// completion before the next one starts. Resolves `false` as soon as
    /// a middleware halts (the rest are skipped), `true` once the whole
    /// sequence has run. An empty chain resolves `true` without invoking
    /// anything.
    pub async fn process(&self, ctx: &mut C) -> bool {
        let mut index = 0;
        while let Some(step) = self.step_at(index) {
            if step.handle(ctx).await == Flow::Halt {
                info!(step = step.name(), index, "chain halted");
                return false;
            }
            debug!(step = step.name(), index, "middleware completed");
            index += 1;
        }
        true
    }

    /// Runs the chain until a middleware signals its [`StopHandle`].
    ///
    /// Each middleware's [`handle_with_stop`](Middleware::handle_with_stop)
    /// receives a handle unique to this call; its return value is ignored.
    /// After a middleware finishes, the handle is inspected: an error
    /// recorded via [`StopHandle::signal_error`] fails the call, a plain
    /// [`StopHandle::signal`] resolves it to `false`, otherwise iteration
    /// continues. Resolves `true` once the whole sequence has run.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Signaled`] carrying the middleware-supplied
    /// error, after the signaling middleware has finished.
    pub async fn process_with_stop(&self, ctx: &mut C) -> Result<bool, ChainError> {
        let stop = StopHandle::new();
        let mut index = 0;
        while let Some(step) = self.step_at(index) {
            step.handle_with_stop(ctx, &stop).await;
            if let Some(error) = stop.take_error() {
                warn!(step = step.name(), index, %error, "chain stopped with error");
                return Err(ChainError::Signaled(error));
            }
            if stop.is_signaled() {
                info!(step = step.name(), index, "chain stopped by signal");
                return Ok(false);
            }
            debug!(step = step.name(), index, "middleware completed");
            index += 1;
        }
        Ok(true)
    }

    /// Runs the chosen execution protocol and, only if it resolves `true`,
    /// invokes `downstream` with the same context.
    ///
    /// Returns `Ok(Some(value))` with the downstream result when the chain
    /// ran to completion, `Ok(None)` when it was halted or signal-stopped.
    ///
    /// # Errors
    ///
    /// With [`Mode::ProcessWithStop`], propagates [`ChainError::Signaled`]
    /// from the gating run; `downstream` is not invoked.
    pub async fn wrap<T, F>(
        &self,
        mode: Mode,
        ctx: &mut C,
        downstream: F,
    ) -> Result<Option<T>, ChainError>
    where
        F: FnOnce(&mut C) -> T,
    {
        let proceed = match mode {
            Mode::Process => self.process(ctx).await,
            Mode::ProcessWithStop => self.process_with_stop(ctx).await?,
        };
        if proceed {
            Ok(Some(downstream(ctx)))
        } else {
            Ok(None)
        }
    }

    // Live view: the lock is held only for this single index read, never
    // across an await, so mid-run mutations are observed immediately.
    fn step_at(&self, index: usize) -> Option<DynMiddleware<C>> {
        self.lock().get(index).cloned()
    }

    fn ensure_runnable(&self, candidate: &DynMiddleware<C>) -> Result<(), ChainError> {
        if (self.validator)(candidate.as_ref()) {
            Ok(())
        } else {
            Err(ChainError::NotRunnable)
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DynMiddleware<C>>> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
