//! Postgres `BIGINT` column support through diesel.
//!
//! Both directions go through [`SqlValue`], so a column read behaves exactly
//! like [`SnowflakeId::from_sql_value`]: a SQL `NULL` or a negative value is
//! rejected rather than turned into an ID.

use std::io::Write;

use diesel::{
    deserialize::{self, FromSql},
    pg::{Pg, PgValue},
    serialize::{self, IsNull, Output, ToSql},
    sql_types::BigInt,
};

use crate::{Error, Result, SnowflakeId, SqlValue};

/// Big-endian `int8` wire bytes for `id`.
fn bigint_bytes(id: &SnowflakeId) -> Result<[u8; 8]> {
    match id.to_sql_value() {
        SqlValue::Integer(v) => Ok(v.to_be_bytes()),
        other => Err(Error::UnsupportedScanType { kind: other.kind() }),
    }
}

/// Decodes an `int8` column value, `None` being SQL `NULL`.
fn scan_bigint(raw: Option<i64>) -> Result<SnowflakeId> {
    let value = raw.map_or(SqlValue::Null, SqlValue::Integer);
    SnowflakeId::from_sql_value(&value)
}

impl ToSql<BigInt, Pg> for SnowflakeId {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(&bigint_bytes(self)?)?;
        Ok(IsNull::No)
    }
}

impl FromSql<BigInt, Pg> for SnowflakeId {
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        Self::from_nullable_sql(Some(value))
    }

    fn from_nullable_sql(value: Option<PgValue<'_>>) -> deserialize::Result<Self> {
        let raw = value
            .map(|v| <i64 as FromSql<BigInt, Pg>>::from_sql(v))
            .transpose()?;
        Ok(scan_bigint(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DISCORD_EPOCH, SnowflakeGenerator};
    use diesel::expression::AsExpression;

    #[test]
    fn implements_bigint_column_traits() {
        fn assert_column<T>()
        where
            T: ToSql<BigInt, Pg> + FromSql<BigInt, Pg> + AsExpression<BigInt>,
        {
        }
        assert_column::<SnowflakeId>();
    }

    #[test]
    fn writes_network_order_int8() {
        let id = SnowflakeId::from_components(1, 2, 3);
        let bytes = bigint_bytes(&id).unwrap();
        assert_eq!(bytes, ((1_u64 << 22) | (2 << 12) | 3).to_be_bytes());
        assert_eq!(i64::from_be_bytes(bytes), id.to_i64());
    }

    #[test]
    fn scans_generated_ids() {
        let generator = SnowflakeGenerator::new(11, DISCORD_EPOCH).unwrap();
        let id = generator.must_generate();

        let raw = i64::from_be_bytes(bigint_bytes(&id).unwrap());
        assert_eq!(scan_bigint(Some(raw)).unwrap(), id);
    }

    #[test]
    fn scan_rejects_null_and_negative() {
        assert_eq!(
            scan_bigint(None),
            Err(Error::UnsupportedScanType { kind: "null" })
        );
        assert_eq!(
            scan_bigint(Some(-1)),
            Err(Error::DecodeOverflow { value: -1 })
        );
    }
}
