//! slv-term — terminal output for slv.
//!
//! [`Renderer`] lays rows out for a fixed terminal width; [`Follower`]
//! drives the query → render cycle and, in follow mode, keeps polling the
//! event source for newer rows.

pub mod follow;
pub mod message;
pub mod palette;
pub mod render;

pub use follow::{Follower, POLL_INTERVAL};
pub use palette::Palette;
pub use render::{Layout, Renderer};
