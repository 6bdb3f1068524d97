//! slv-core — domain logic for the slv syslog viewer.
//!
//! Everything here is pure: no terminal and no database. The binary wires
//! these pieces together with an event source and a renderer.
//!
//! # Data flow
//!
//! ```text
//! Options + ProfileDocument ──► ConfigResolver ──► Config
//!                                   │
//!                          PeriodResolver
//!
//! Config ──► QueryPlanBuilder ──► QueryPlan ──► (event source) ──► EventRow
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod period;
pub mod query;
pub mod schema;
pub mod types;

pub use config::{Config, ConfigResolver, Options, Profile, ProfileDocument};
pub use connection::Connection;
pub use error::{Error, Result};
pub use period::{PeriodPlan, PeriodResolver};
pub use query::{QueryPlan, QueryPlanBuilder};
pub use schema::SchemaMap;
pub use types::{EventRow, Severity};
