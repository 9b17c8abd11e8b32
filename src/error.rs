use thiserror::Error;

/// Boxed error value carried by [`ChainError::Signaled`].
///
/// Middlewares may stop a chain with any error type; it is boxed here so
/// the chain does not need to be generic over it. Callers can recover the
/// concrete type with `downcast_ref`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while mutating or executing a chain.
///
/// # Non-Exhaustive
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code. When matching
/// on this error, always include a wildcard pattern:
///
/// ```
/// use kusari::ChainError;
///
/// fn describe(error: &ChainError) -> String {
///     match error {
///         ChainError::NotRunnable => "rejected at insertion".to_string(),
///         ChainError::Signaled(inner) => format!("stopped: {inner}"),
///         _ => format!("error: {error}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChainError {
    /// A candidate passed to a mutation operation was rejected by the
    /// chain's validity predicate.
    ///
    /// Candidates processed before the rejected one in the same call
    /// remain applied.
    #[error("value is not a runnable step")]
    NotRunnable,

    /// A middleware stopped the chain with an error via
    /// [`StopHandle::signal_error`](crate::StopHandle::signal_error).
    ///
    /// Surfaces after the signaling middleware has finished; no further
    /// middlewares run.
    #[error("chain stopped with error: {0}")]
    Signaled(BoxError),
}
