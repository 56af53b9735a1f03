//! Cooperative cancellation.
//!
//! A run checks its token only between stages; an in-flight generation call
//! is never interrupted.

mod token;

pub use token::CancellationToken;
