//! Shared test utilities for slv integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fake sources are deterministic under
//! `tokio::time::pause()`.

pub mod builders;
pub mod table_source;

pub use builders::*;
pub use table_source::*;
