//! Lock-free, time-sortable 64-bit Snowflake IDs.
//!
//! A [`SnowflakeGenerator`] packs a 41-bit millisecond timestamp (relative to
//! a caller-chosen epoch), a 10-bit node id and a 12-bit per-millisecond
//! sequence into a [`SnowflakeId`]. Generation is a single compare-and-swap on
//! one atomic state word, so one generator can be shared across any number of
//! threads.
//!
//! ```
//! use snowfall::{SnowflakeGenerator, DISCORD_EPOCH};
//!
//! let generator = SnowflakeGenerator::new(7, DISCORD_EPOCH).unwrap();
//! let id = generator.generate().unwrap();
//!
//! assert_eq!(id.node_id(), 7);
//! assert_eq!(id.to_string().parse::<snowfall::SnowflakeId>().unwrap(), id);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod json;
mod sql;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::sql::*;
pub use crate::time::*;
