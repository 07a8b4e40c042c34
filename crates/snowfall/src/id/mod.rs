pub mod layout;
mod snowflake;

pub use snowflake::*;
