//! JSON (serde) representations of [`SnowflakeId`](crate::SnowflakeId).
//!
//! The `Serialize` impl writes the decimal **string** form, `"1234"`, so that
//! consumers which parse JSON numbers as doubles never lose precision. This is
//! the wire contract. `Deserialize` accepts the string form and, for
//! compatibility, a plain JSON number.
//!
//! Use [`as_native`] with `#[serde(with = "...")]` to write the integer form
//! instead.
mod snowflake;

pub use snowflake::as_native;
