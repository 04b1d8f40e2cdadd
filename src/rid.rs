//! Record identifiers: the `(cluster_id, position)` pairs that links and link
//! collections carry.

use std::convert::TryFrom;

use crate::error::{RecordError, Result};
use crate::primitive::{decode_u16, decode_u64, encode_u16, encode_u64};
use crate::varint::{decode_zigzag_varint, encode_zigzag_varint};

/// A record identifier: a 16-bit cluster id and a 64-bit position within it.
///
/// Both fields are non-negative by invariant; the type stores them as
/// unsigned so that can't be violated in-process, even though the wire form
/// (for free-standing links) is a signed ZigZag varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rid {
    /// The cluster (partition) id.
    pub cluster_id: u16,
    /// The position within the cluster.
    pub position: u64,
}

impl Rid {
    /// Builds a new RID from its parts.
    pub fn new(cluster_id: u16, position: u64) -> Self {
        Rid {
            cluster_id,
            position,
        }
    }

    /// Encodes this RID as two ZigZag varints, the form used by free-standing
    /// links, link-lists, link-sets and link-maps (§4.3, tags 13/14/15/16).
    pub fn encode_varint(&self, out: &mut Vec<u8>) {
        encode_zigzag_varint(self.cluster_id as i64, out);
        encode_zigzag_varint(self.position as i64, out);
    }

    /// Decodes the ZigZag-varint link form.
    pub fn decode_varint(bytes: &[u8]) -> Result<(Rid, &[u8])> {
        let (cluster_id, rest) = decode_zigzag_varint(bytes)?;
        let (position, rest) = decode_zigzag_varint(rest)?;
        let cluster_id = u16::try_from(cluster_id).map_err(|_| RecordError::InvalidLength {
            length: cluster_id,
        })?;
        Ok((
            Rid {
                cluster_id,
                position: position as u64,
            },
            rest,
        ))
    }

    /// Encodes this RID as a fixed 2-byte cluster id and 8-byte position, both
    /// big-endian: the form used inside embedded link bags (§4.3.4), which is
    /// deliberately *not* the varint form above.
    pub fn encode_fixed(&self, out: &mut Vec<u8>) {
        encode_u16(self.cluster_id, out);
        encode_u64(self.position, out);
    }

    /// Decodes the fixed-width link-bag RID form.
    pub fn decode_fixed(bytes: &[u8]) -> Result<(Rid, &[u8])> {
        let (cluster_id, rest) = decode_u16(bytes)?;
        let (position, rest) = decode_u64(rest)?;
        Ok((
            Rid {
                cluster_id,
                position,
            },
            rest,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_round_trip() {
        let rid = Rid::new(9, 14);
        let mut buf = Vec::new();
        rid.encode_varint(&mut buf);
        let (decoded, rest) = Rid::decode_varint(&buf).unwrap();
        assert_eq!(decoded, rid);
        assert!(rest.is_empty());
    }

    #[test]
    fn fixed_round_trip_matches_link_bag_fixture() {
        let rid = Rid::new(1, 22);
        let mut buf = Vec::new();
        rid.encode_fixed(&mut buf);
        assert_eq!(buf, vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x16]);
        let (decoded, rest) = Rid::decode_fixed(&buf).unwrap();
        assert_eq!(decoded, rid);
        assert!(rest.is_empty());
    }
}
