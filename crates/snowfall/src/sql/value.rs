use crate::{Error, Result, SnowflakeId};

/// A database driver value, as handed to or received from a SQL driver.
///
/// Snowflakes are stored as `BIGINT`. On the way out they are always
/// [`SqlValue::Integer`]; on the way in, drivers that surface numbers as text
/// are also accepted, either as [`SqlValue::Text`] or as the raw ASCII digits
/// in [`SqlValue::Bytes`].
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
}

impl SqlValue {
    /// Name of the value's kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
        }
    }
}

impl SnowflakeId {
    /// The value to bind when writing this ID to a `BIGINT` column.
    #[must_use]
    pub const fn to_sql_value(&self) -> SqlValue {
        SqlValue::Integer(self.to_i64())
    }

    /// Reads an ID back from a driver value.
    ///
    /// Accepts an integer, decimal ASCII bytes or decimal text.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedScanType`] for any other kind of value
    /// - [`Error::InvalidDigits`] or [`Error::InvalidUtf8`] if text or bytes
    ///   are not a decimal integer
    /// - [`Error::DecodeOverflow`] for negative integers
    ///
    /// ```
    /// use snowfall::{Error, SnowflakeId, SqlValue};
    ///
    /// let id = SnowflakeId::from_components(1, 2, 3);
    /// assert_eq!(SnowflakeId::from_sql_value(&id.to_sql_value()).unwrap(), id);
    /// assert_eq!(
    ///     SnowflakeId::from_sql_value(&SqlValue::Real(2.5)),
    ///     Err(Error::UnsupportedScanType { kind: "real" }),
    /// );
    /// ```
    pub fn from_sql_value(value: &SqlValue) -> Result<Self> {
        match value {
            SqlValue::Integer(v) => Self::try_from_i64(*v),
            SqlValue::Bytes(bytes) => core::str::from_utf8(bytes)?.parse(),
            SqlValue::Text(text) => text.parse(),
            SqlValue::Null | SqlValue::Real(_) | SqlValue::Bool(_) => {
                Err(Error::UnsupportedScanType { kind: value.kind() })
            }
        }
    }
}

impl From<SnowflakeId> for SqlValue {
    fn from(id: SnowflakeId) -> Self {
        id.to_sql_value()
    }
}

impl TryFrom<&SqlValue> for SnowflakeId {
    type Error = Error;

    fn try_from(value: &SqlValue) -> Result<Self> {
        Self::from_sql_value(value)
    }
}

impl TryFrom<SqlValue> for SnowflakeId {
    type Error = Error;

    fn try_from(value: SqlValue) -> Result<Self> {
        Self::from_sql_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DISCORD_EPOCH, SnowflakeGenerator};

    #[test]
    fn value_is_integer() {
        let generator = SnowflakeGenerator::new(3, DISCORD_EPOCH).unwrap();
        let id = generator.must_generate();

        let SqlValue::Integer(v) = id.to_sql_value() else {
            panic!("expected an integer value");
        };
        assert_eq!(v as u64, id.to_raw());
        assert_eq!(SqlValue::from(id), SqlValue::Integer(v));
    }

    #[test]
    fn scan_roundtrips_every_accepted_kind() {
        let generator = SnowflakeGenerator::new(3, DISCORD_EPOCH).unwrap();
        let id = generator.must_generate();

        let scanned = SnowflakeId::from_sql_value(&id.to_sql_value()).unwrap();
        assert_eq!(scanned, id);

        let bytes = SqlValue::Bytes(id.to_i64().to_string().into_bytes());
        assert_eq!(SnowflakeId::try_from(&bytes).unwrap(), id);

        let text = SqlValue::Text(id.to_i64().to_string());
        assert_eq!(SnowflakeId::try_from(text).unwrap(), id);
    }

    #[test]
    fn scan_rejects_unsupported_kinds() {
        assert_eq!(
            SnowflakeId::from_sql_value(&SqlValue::Real(2.5)),
            Err(Error::UnsupportedScanType { kind: "real" })
        );
        assert_eq!(
            SnowflakeId::from_sql_value(&SqlValue::Bool(true)),
            Err(Error::UnsupportedScanType { kind: "bool" })
        );
        assert_eq!(
            SnowflakeId::from_sql_value(&SqlValue::Null),
            Err(Error::UnsupportedScanType { kind: "null" })
        );
    }

    #[test]
    fn scan_rejects_malformed_input() {
        assert!(matches!(
            SnowflakeId::from_sql_value(&SqlValue::Text("abc".into())),
            Err(Error::InvalidDigits(_))
        ));
        assert!(matches!(
            SnowflakeId::from_sql_value(&SqlValue::Bytes(vec![0xff, 0x31])),
            Err(Error::InvalidUtf8(_))
        ));
        assert_eq!(
            SnowflakeId::from_sql_value(&SqlValue::Integer(-42)),
            Err(Error::DecodeOverflow { value: -42 })
        );
    }
}
