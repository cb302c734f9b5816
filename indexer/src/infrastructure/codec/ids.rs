//! Identifiers used on the Avalanche UTXO chains.
//!
//! Ids render in cb58: base58 over the raw bytes followed by the last four
//! bytes of their sha256 checksum.

use bech32::{Bech32, Hrp};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DecodeError;

const CHECKSUM_LEN: usize = 4;

/// Encode bytes as cb58
pub fn cb58_encode(bytes: &[u8]) -> String {
    let checksum = Sha256::digest(bytes);
    let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&checksum[checksum.len() - CHECKSUM_LEN..]);
    bs58::encode(buf).into_string()
}

/// Decode a cb58 string, verifying its checksum
pub fn cb58_decode(value: &str) -> Result<Vec<u8>, DecodeError> {
    let raw = bs58::decode(value)
        .into_vec()
        .map_err(|e| DecodeError::Malformed(format!("invalid base58: {}", e)))?;
    if raw.len() < CHECKSUM_LEN {
        return Err(DecodeError::Malformed("cb58 value too short".to_string()));
    }
    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let expected = Sha256::digest(payload);
    if checksum != &expected[expected.len() - CHECKSUM_LEN..] {
        return Err(DecodeError::Malformed("cb58 checksum mismatch".to_string()));
    }
    Ok(payload.to_vec())
}

/// Decode `0x` prefixed hex carrying a trailing four byte sha256 checksum,
/// the encoding the node's index API returns containers in
pub fn hex_checksum_decode(value: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| DecodeError::Malformed("hex value missing 0x prefix".to_string()))?;
    let raw =
        hex::decode(digits).map_err(|e| DecodeError::Malformed(format!("invalid hex: {}", e)))?;
    if raw.len() < CHECKSUM_LEN {
        return Err(DecodeError::Malformed("hex value too short".to_string()));
    }
    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let expected = Sha256::digest(payload);
    if checksum != &expected[expected.len() - CHECKSUM_LEN..] {
        return Err(DecodeError::Malformed("hex checksum mismatch".to_string()));
    }
    Ok(payload.to_vec())
}

/// 32 byte id of transactions, blocks, assets and chains
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Id(pub [u8; 32]);

impl Id {
    pub const EMPTY: Id = Id([0u8; 32]);

    /// sha256 of `data`
    pub fn digest(data: &[u8]) -> Self {
        Id(Sha256::digest(data).into())
    }

    /// Id of the `index`-th output of the object this id names
    pub fn prefix(&self, index: u64) -> Id {
        let mut hasher = Sha256::new();
        hasher.update(index.to_be_bytes());
        hasher.update(self.0);
        Id(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cb58_encode(&self.0))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

impl FromStr for Id {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = cb58_decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DecodeError::Malformed(format!("id {} is not 32 bytes", s)))?;
        Ok(Id(arr))
    }
}

/// 20 byte id of addresses and nodes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShortId(pub [u8; 20]);

impl ShortId {
    /// Node ids render with a `NodeID-` prefix
    pub fn node_id(&self) -> String {
        format!("NodeID-{}", cb58_encode(&self.0))
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cb58_encode(&self.0))
    }
}

impl fmt::Debug for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortId({})", self)
    }
}

/// Formats short ids as bech32 addresses for one network
#[derive(Debug, Clone)]
pub struct AddressFormatter {
    hrp: Hrp,
}

impl AddressFormatter {
    pub fn new(hrp: &str) -> Result<Self, DecodeError> {
        let hrp = Hrp::parse(hrp)
            .map_err(|e| DecodeError::Malformed(format!("invalid bech32 hrp {}: {}", hrp, e)))?;
        Ok(Self { hrp })
    }

    pub fn format(&self, addr: &ShortId) -> Result<String, DecodeError> {
        bech32::encode::<Bech32>(self.hrp, &addr.0)
            .map_err(|e| DecodeError::Malformed(format!("bech32 encoding failed: {}", e)))
    }

    pub fn format_all(&self, addrs: &[ShortId]) -> Result<Vec<String>, DecodeError> {
        addrs.iter().map(|a| self.format(a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_matches_avalanche_rendering() {
        assert_eq!(
            Id::EMPTY.to_string(),
            "11111111111111111111111111111111LpoYY"
        );
    }

    #[test]
    fn cb58_round_trips_and_checks_checksum() {
        let id = Id::digest(b"hello");
        let parsed: Id = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let mut text = id.to_string();
        let last = text.pop().unwrap();
        text.push(if last == '1' { '2' } else { '1' });
        assert!(text.parse::<Id>().is_err());
    }

    #[test]
    fn prefix_is_deterministic_and_index_sensitive() {
        let id = Id::digest(b"tx");
        assert_eq!(id.prefix(0), id.prefix(0));
        assert_ne!(id.prefix(0), id.prefix(1));
        assert_ne!(id.prefix(0), id);
    }

    #[test]
    fn hex_checksum_is_verified() {
        let payload = b"container";
        let checksum = Sha256::digest(payload);
        let mut raw = payload.to_vec();
        raw.extend_from_slice(&checksum[28..]);
        let encoded = format!("0x{}", hex::encode(&raw));
        assert_eq!(hex_checksum_decode(&encoded).unwrap(), payload.to_vec());

        raw[0] ^= 1;
        assert!(hex_checksum_decode(&format!("0x{}", hex::encode(&raw))).is_err());
        assert!(hex_checksum_decode("abcd").is_err());
    }

    #[test]
    fn node_ids_carry_prefix() {
        let node = ShortId([0u8; 20]);
        assert!(node.node_id().starts_with("NodeID-"));
    }

    #[test]
    fn addresses_use_network_hrp() {
        let formatter = AddressFormatter::new("fuji").unwrap();
        let addr = formatter.format(&ShortId([7u8; 20])).unwrap();
        assert!(addr.starts_with("fuji1"));
    }
}
