//! Builders for hand-made codec payloads used by unit tests.

use alloy_primitives::{Address, Bytes as AlloyBytes, B256, U256};
use alloy_rlp::{Encodable, Header};

use super::ids::{Id, ShortId};

#[derive(Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn version(v: u16) -> Self {
        let mut b = Self::default();
        b.0.extend_from_slice(&v.to_be_bytes());
        b
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn id(mut self, id: &Id) -> Self {
        self.0.extend_from_slice(&id.0);
        self
    }

    pub fn short_id(mut self, id: &ShortId) -> Self {
        self.0.extend_from_slice(&id.0);
        self
    }

    pub fn bytes(self, data: &[u8]) -> Self {
        let mut b = self.u32(data.len() as u32);
        b.0.extend_from_slice(data);
        b
    }

    pub fn string(self, s: &str) -> Self {
        let mut b = self.u16(s.len() as u16);
        b.0.extend_from_slice(s.as_bytes());
        b
    }

    pub fn raw(mut self, data: &[u8]) -> Self {
        self.0.extend_from_slice(data);
        self
    }

    /// secp transfer output body: amount, locktime, threshold, addresses
    pub fn transfer_output(self, type_id: u32, amount: u64, addr: &ShortId) -> Self {
        self.u32(type_id)
            .u64(amount)
            .u64(0)
            .u32(1)
            .u32(1)
            .short_id(addr)
    }

    /// secp transfer input with a single signature index
    pub fn transfer_input(self, type_id: u32, amount: u64) -> Self {
        self.u32(type_id).u64(amount).u32(1).u32(0)
    }

    /// Base tx header with the given outputs/inputs already encoded
    pub fn base_tx(
        self,
        chain: &Id,
        outs: (u32, Vec<u8>),
        ins: (u32, Vec<u8>),
        memo: &[u8],
    ) -> Self {
        self.u32(1)
            .id(chain)
            .u32(outs.0)
            .raw(&outs.1)
            .u32(ins.0)
            .raw(&ins.1)
            .bytes(memo)
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

fn rlp_list(items: &[&dyn Encodable]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        item.encode(&mut payload);
    }
    let mut out = Vec::new();
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(&mut out);
    out.extend_from_slice(&payload);
    out
}

/// RLP contract chain block without transactions
pub fn evm_block(number: u64, timestamp: u64, ext_data: &[u8]) -> Vec<u8> {
    let parent = B256::repeat_byte(0x11);
    let zero = B256::ZERO;
    let coinbase = Address::ZERO;
    let bloom = AlloyBytes::from(vec![0u8; 256]);
    let difficulty = U256::from(1u64);
    let header = rlp_list(&[
        &parent,
        &zero,
        &coinbase,
        &zero,
        &zero,
        &zero,
        &bloom,
        &difficulty,
        &number,
        &8_000_000u64,
        &0u64,
        &timestamp,
    ]);
    let empty_list = rlp_list(&[]);
    let version = 0u32;
    let ext = AlloyBytes::copy_from_slice(ext_data);

    let mut payload = header;
    payload.extend_from_slice(&empty_list);
    payload.extend_from_slice(&empty_list);
    version.encode(&mut payload);
    ext.encode(&mut payload);

    let mut out = Vec::new();
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(&mut out);
    out.extend_from_slice(&payload);
    out
}
