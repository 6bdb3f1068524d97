//! slv-store — event sources for slv.
//!
//! An [`EventSource`] executes a [`QueryPlan`] against the system events
//! table and returns rows in the order the plan asks for. The only real
//! implementation is [`mysql::MySqlSource`]; tests substitute in-memory fakes.

pub mod error;
pub mod mysql;
pub mod statement;

pub use error::StoreError;
pub use mysql::MySqlSource;

use slv_core::{EventRow, QueryPlan};

/// Executes query plans against the events table.
///
/// Failures are fatal to the caller: there is no retry.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<EventRow>, StoreError>;
}
