//! Request middleware.
//!
//! Purpose: request lifecycle concerns that wrap every route, currently
//! trace identifier propagation and per-request completion logging.

pub mod trace;

pub use trace::Trace;
