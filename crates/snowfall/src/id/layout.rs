use crate::{Error, Result};

/// A single bit field within a packed 64-bit snowflake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    /// Human readable field name, used in error messages.
    pub name: &'static str,
    /// Number of bits the field occupies.
    pub width: u32,
    /// Position of the field's lowest bit.
    pub shift: u32,
}

impl BitField {
    /// Largest value the field can hold.
    pub const fn max(&self) -> u64 {
        (1 << self.width) - 1
    }

    /// Mask selecting the field in its packed position.
    pub const fn mask(&self) -> u64 {
        self.max() << self.shift
    }

    /// Places `value` into the field, discarding any bits above its width.
    #[inline]
    pub const fn place(&self, value: u64) -> u64 {
        (value & self.max()) << self.shift
    }

    /// Reads the field back out of a packed value.
    #[inline]
    pub const fn extract(&self, raw: u64) -> u64 {
        (raw >> self.shift) & self.max()
    }

    /// Like [`Self::place`] but rejects values wider than the field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOverflow`] if `value` exceeds [`Self::max`].
    pub const fn try_place(&self, value: u64) -> Result<u64> {
        if value > self.max() {
            return Err(Error::FieldOverflow {
                field: self.name,
                value,
                max: self.max(),
            });
        }
        Ok(value << self.shift)
    }
}

/// Per-millisecond counter, bits 0 through 11.
pub const SEQUENCE: BitField = BitField {
    name: "sequence",
    width: 12,
    shift: 0,
};

/// Generator node id, bits 12 through 21.
pub const NODE_ID: BitField = BitField {
    name: "node id",
    width: 10,
    shift: SEQUENCE.shift + SEQUENCE.width,
};

/// Milliseconds since the generator's epoch, bits 22 through 62.
pub const TIMESTAMP: BitField = BitField {
    name: "timestamp",
    width: 41,
    shift: NODE_ID.shift + NODE_ID.width,
};

/// The three fields, lowest first.
pub const FIELDS: [BitField; 3] = [SEQUENCE, NODE_ID, TIMESTAMP];

/// The top bit is never set, so every valid snowflake is a non-negative `i64`.
pub const RESERVED_MASK: u64 = !(SEQUENCE.mask() | NODE_ID.mask() | TIMESTAMP.mask());

const _: () = {
    assert!(TIMESTAMP.shift + TIMESTAMP.width == 63);
    assert!(SEQUENCE.mask() & NODE_ID.mask() == 0);
    assert!(NODE_ID.mask() & TIMESTAMP.mask() == 0);
    assert!(RESERVED_MASK == 1 << 63);
};

/// Packs the three components into a raw snowflake.
///
/// # Errors
///
/// Returns [`Error::FieldOverflow`] naming the first component that does not
/// fit in its field.
pub const fn pack(timestamp: u64, node_id: u64, sequence: u64) -> Result<u64> {
    let timestamp = match TIMESTAMP.try_place(timestamp) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    let node_id = match NODE_ID.try_place(node_id) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    let sequence = match SEQUENCE.try_place(sequence) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    Ok(timestamp | node_id | sequence)
}

/// Splits a raw snowflake into `(timestamp, node_id, sequence)`.
///
/// The reserved bit is ignored.
pub const fn unpack(raw: u64) -> (u64, u64, u64) {
    (
        TIMESTAMP.extract(raw),
        NODE_ID.extract(raw),
        SEQUENCE.extract(raw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_table_matches_layout() {
        assert_eq!(SEQUENCE.max(), 4095);
        assert_eq!(NODE_ID.max(), 1023);
        assert_eq!(TIMESTAMP.max(), (1 << 41) - 1);
        assert_eq!(NODE_ID.shift, 12);
        assert_eq!(TIMESTAMP.shift, 22);
        assert_eq!(FIELDS.iter().map(|f| f.width).sum::<u32>(), 63);
    }

    #[test]
    fn pack_unpack_boundaries() {
        for ts in [0, TIMESTAMP.max()] {
            for node in [0, NODE_ID.max()] {
                for seq in [0, SEQUENCE.max()] {
                    let raw = pack(ts, node, seq).unwrap();
                    assert_eq!(raw & RESERVED_MASK, 0);
                    assert_eq!(unpack(raw), (ts, node, seq));
                    assert_eq!(raw, (ts << 22) | (node << 12) | seq);
                }
            }
        }
    }

    #[test]
    fn pack_rejects_out_of_range() {
        assert_eq!(
            pack(0, 1024, 0),
            Err(Error::FieldOverflow {
                field: "node id",
                value: 1024,
                max: 1023
            })
        );
        assert!(matches!(
            pack(0, 0, 4096),
            Err(Error::FieldOverflow {
                field: "sequence",
                ..
            })
        ));
        assert!(matches!(
            pack(1 << 41, 0, 0),
            Err(Error::FieldOverflow {
                field: "timestamp",
                ..
            })
        ));
    }

    #[test]
    fn place_masks_overflowing_bits() {
        assert_eq!(SEQUENCE.place(4096), 0);
        assert_eq!(NODE_ID.place(1024 + 3), 3 << 12);
    }

    #[test]
    fn unpack_ignores_reserved_bit() {
        let raw = pack(5, 6, 7).unwrap();
        assert_eq!(unpack(raw | RESERVED_MASK), (5, 6, 7));
    }
}
