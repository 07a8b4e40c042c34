use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::{Error, SnowflakeId};

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if d.is_human_readable() {
            d.deserialize_any(SnowflakeVisitor)
        } else {
            d.deserialize_str(SnowflakeVisitor)
        }
    }
}

struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = SnowflakeId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a snowflake as a decimal string or a non-negative integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(de::Error::custom)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        core::str::from_utf8(v)
            .map_err(|e| de::Error::custom(Error::from(e)))
            .and_then(|s| self.visit_str(s))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        SnowflakeId::try_from_i64(v).map_err(de::Error::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let id = SnowflakeId::from_raw(v);
        if !id.is_valid() {
            return Err(de::Error::custom(Error::DecodeOverflow { value: id.to_i64() }));
        }
        Ok(id)
    }
}

/// Serialize and deserialize a [`SnowflakeId`] as its native integer.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use snowfall::SnowflakeId;
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "snowfall::json::as_native")]
///     id: SnowflakeId,
/// }
///
/// let row = Row { id: SnowflakeId::from_raw(42) };
/// assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"id":42}"#);
/// ```
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::{Error, SnowflakeId};

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value sets the reserved bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = SnowflakeId::from_raw(u64::deserialize(d)?);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(Error::DecodeOverflow {
                value: id.to_i64(),
            }));
        }
        Ok(id)
    }
}
