//! Commonly used types and traits

pub use crate::chain::{Chain, Mode, Position};
pub use crate::error::ChainError;
pub use crate::middleware::{DynMiddleware, Flow, Middleware};
pub use crate::stop::StopHandle;
