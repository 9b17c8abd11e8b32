//! # Kusari (鎖)
//!
//! A lightweight asynchronous middleware chain for Rust.
//!
//! The name "Kusari" (鎖) means "chain" in Japanese, reflecting what this
//! crate is: an ordered chain of middlewares, run strictly one after
//! another, with well-defined ways to stop early. It is a composition
//! primitive meant for embedding in larger applications (HTTP handlers,
//! lifecycle hooks, pipelines), not a framework.
//!
//! ## Features
//!
//! - **Two stopping protocols**: halt on a [`Flow::Halt`] verdict, or
//!   halt only through an explicit per-run [`StopHandle`]
//! - **Positional insertion**: append, prepend, or insert relative to an
//!   existing middleware ([`Position::Before`] / [`Position::After`])
//! - **Async first**: built with `async-trait`; each middleware is
//!   awaited to completion before the next starts
//! - **Shareable**: mutation takes `&self`, so an `Arc<Chain>` can be
//!   grown or executed from several tasks - even from a running
//!   middleware
//! - **Lightweight**: no runtime dependency; errors via `thiserror`,
//!   logging via `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use kusari::prelude::*;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Validate;
//!
//! #[async_trait]
//! impl Middleware<Vec<String>> for Validate {
//!     async fn handle(&self, log: &mut Vec<String>) -> Flow {
//!         log.push("validated".to_string());
//!         Flow::Continue
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Reject;
//!
//! #[async_trait]
//! impl Middleware<Vec<String>> for Reject {
//!     async fn handle(&self, _log: &mut Vec<String>) -> Flow {
//!         Flow::Halt
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), kusari::ChainError> {
//! let chain = Chain::new();
//! chain.append([Arc::new(Validate) as DynMiddleware<Vec<String>>])?;
//!
//! let mut log = Vec::new();
//! assert!(chain.process(&mut log).await);
//! assert_eq!(log, vec!["validated".to_string()]);
//!
//! // A halting middleware stops the run; process resolves false.
//! chain.prepend([Arc::new(Reject) as DynMiddleware<Vec<String>>])?;
//! let mut log = Vec::new();
//! assert!(!chain.process(&mut log).await);
//! assert!(log.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Stopping with a signal
//!
//! In the second protocol, [`Chain::process_with_stop`], middleware
//! return values are ignored; the run stops only when a middleware calls
//! [`StopHandle::signal`] (or fails it with [`StopHandle::signal_error`]):
//!
//! ```rust
//! use kusari::prelude::*;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Quota;
//!
//! #[async_trait]
//! impl Middleware<u32> for Quota {
//!     async fn handle(&self, _requests: &mut u32) -> Flow {
//!         Flow::Continue
//!     }
//!
//!     async fn handle_with_stop(&self, requests: &mut u32, stop: &StopHandle) {
//!         if *requests > 100 {
//!             stop.signal();
//!         }
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), kusari::ChainError> {
//! let chain = Chain::new();
//! chain.append([Arc::new(Quota) as DynMiddleware<u32>])?;
//!
//! let mut light = 3;
//! assert!(chain.process_with_stop(&mut light).await?);
//!
//! let mut heavy = 250;
//! assert!(!chain.process_with_stop(&mut heavy).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Gating a downstream function
//!
//! [`Chain::wrap`] composes the two protocols with an arbitrary
//! downstream function: the function runs only if the chain resolves
//! `true`, and its result is forwarded.
//!
//! ```rust
//! # use kusari::prelude::*;
//! # #[tokio::main]
//! # async fn main() -> Result<(), kusari::ChainError> {
//! let chain = Chain::<u32>::new();
//! let mut ctx = 1;
//!
//! let result = chain.wrap(Mode::Process, &mut ctx, |ctx| *ctx + 1).await?;
//! assert_eq!(result, Some(2));
//! # Ok(())
//! # }
//! ```

mod chain;
mod error;
mod middleware;
mod stop;

pub mod prelude;

pub use chain::{Chain, Mode, Position};
pub use error::{BoxError, ChainError};
pub use middleware::{DynMiddleware, Flow, Middleware};
pub use stop::StopHandle;
