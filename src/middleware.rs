use crate::stop::StopHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Verdict returned by [`Middleware::handle`].
///
/// Only [`Flow::Halt`] stops a chain; whatever the middleware wrote into
/// the context has no effect on iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Continue with the next middleware in the chain.
    Continue,
    /// Stop the chain; the run resolves `false`.
    Halt,
}

/// A unit of work stored in a [`Chain`](crate::Chain).
///
/// Middlewares run strictly one at a time, each awaited to completion
/// before the next starts, and every one receives the same mutable
/// context the caller handed to the execution call.
///
/// A middleware participates in two execution protocols:
///
/// - [`Chain::process`](crate::Chain::process) calls [`handle`] and stops
///   the chain when it returns [`Flow::Halt`].
/// - [`Chain::process_with_stop`](crate::Chain::process_with_stop) calls
///   [`handle_with_stop`] and stops only when the middleware signals the
///   supplied [`StopHandle`]; return values are ignored in this protocol.
///
/// The default [`handle_with_stop`] delegates to [`handle`] and discards
/// the verdict, so a middleware written for the first protocol works
/// unchanged in the second (where it can never stop the chain).
///
/// # Type Parameter
///
/// * `C` - The context type threaded through the chain
///
/// # Examples
///
/// ```
/// use kusari::{Flow, Middleware};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct Authorize;
///
/// #[async_trait]
/// impl Middleware<Vec<String>> for Authorize {
///     async fn handle(&self, log: &mut Vec<String>) -> Flow {
///         log.push("authorized".to_string());
///         Flow::Continue
///     }
/// }
/// ```
///
/// [`handle`]: Middleware::handle
/// [`handle_with_stop`]: Middleware::handle_with_stop
#[async_trait]
pub trait Middleware<C: Send>: Send + Sync {
    /// Executes the middleware logic.
    ///
    /// # Returns
    ///
    /// - [`Flow::Continue`] - proceed to the next middleware
    /// - [`Flow::Halt`] - stop the chain; the run resolves `false`
    async fn handle(&self, ctx: &mut C) -> Flow;

    /// Executes the middleware logic in the signal-stopped protocol.
    ///
    /// The chain ignores anything this method computes; the only way to
    /// stop is calling [`StopHandle::signal`] or
    /// [`StopHandle::signal_error`] on `stop`.
    async fn handle_with_stop(&self, ctx: &mut C, stop: &StopHandle) {
        let _ = stop;
        let _ = self.handle(ctx).await;
    }

    /// Returns the middleware name, used for logging.
    ///
    /// By default, the last segment of the type name. Override to provide
    /// a custom name.
    fn name(&self) -> &'static str {
        let full_name = std::any::type_name::<Self>();
        full_name.split("::").last().unwrap_or("middleware")
    }
}

/// A reference-counted, type-erased middleware.
///
/// Chains store middlewares behind `Arc`, so the same value can appear in
/// several chains, or more than once in the same chain. Identity for
/// [`Chain::remove`](crate::Chain::remove) and
/// [`Chain::insert_relative`](crate::Chain::insert_relative) is pointer
/// equality over this `Arc`.
pub type DynMiddleware<C> = Arc<dyn Middleware<C>>;
