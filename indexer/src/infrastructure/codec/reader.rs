use crate::domain::errors::DecodeError;

use super::config::{CodecConfig, TypeTag};
use super::ids::{Id, ShortId};

/// Upper bound for slice lengths read from the wire
pub const MAX_SLICE_LEN: usize = 256 * 1024;

/// Big-endian reader over codec bytes, bound to one codec configuration.
///
/// The codec version is read from the first two bytes; interface type ids
/// are resolved against that version.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    config: &'a CodecConfig,
    version: u16,
}

impl<'a> Reader<'a> {
    /// Read the codec version prefix and check it is supported
    pub fn new(bytes: &'a [u8], config: &'a CodecConfig) -> Result<Self, DecodeError> {
        let mut reader = Self {
            bytes,
            pos: 0,
            config,
            version: 0,
        };
        let version = reader.u16()?;
        if !config.supports(version) {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        reader.version = version;
        Ok(reader)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes between two positions of this reader
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.bytes[start..end]
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fail if anything is left after the top-level value
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    pub fn id(&mut self) -> Result<Id, DecodeError> {
        Ok(Id(self.array()?))
    }

    pub fn short_id(&mut self) -> Result<ShortId, DecodeError> {
        Ok(ShortId(self.array()?))
    }

    /// Fixed 65 byte recoverable signature
    pub fn signature(&mut self) -> Result<[u8; 65], DecodeError> {
        self.array()
    }

    /// Slice length prefix, bounded by [`MAX_SLICE_LEN`]
    pub fn slice_len(&mut self) -> Result<usize, DecodeError> {
        let len = self.u32()? as usize;
        if len > MAX_SLICE_LEN {
            return Err(DecodeError::LengthTooLarge {
                len,
                max: MAX_SLICE_LEN,
            });
        }
        Ok(len)
    }

    /// `[]byte` with a u32 length prefix
    pub fn bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.slice_len()?;
        Ok(self.take(len)?.to_vec())
    }

    /// String with a u16 length prefix
    pub fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u16()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| DecodeError::Malformed(format!("invalid utf-8 string: {}", e)))
    }

    /// Length-prefixed sequence decoded item by item
    pub fn vec<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let len = self.slice_len()?;
        let mut out = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            out.push(item(self)?);
        }
        Ok(out)
    }

    /// Interface type id resolved against the codec configuration
    pub fn type_tag(&mut self) -> Result<TypeTag, DecodeError> {
        let type_id = self.u32()?;
        self.config.resolve(self.version, type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_fields() {
        let config = CodecConfig::pvm();
        let bytes = [0u8, 0, 0, 0, 1, 0, 0x02, b'h', b'i'];
        let mut reader = Reader::new(&bytes, &config).unwrap();
        assert_eq!(reader.u16().unwrap(), 0);
        assert_eq!(reader.u8().unwrap(), 1);
        assert_eq!(reader.string().unwrap(), "hi");
        reader.finish().unwrap();
    }

    #[test]
    fn reports_eof_and_trailing_bytes() {
        let config = CodecConfig::pvm();
        let bytes = [0u8, 0, 0, 1];
        let mut reader = Reader::new(&bytes, &config).unwrap();
        assert_eq!(reader.finish(), Err(DecodeError::TrailingBytes(2)));
        assert!(matches!(
            reader.u32(),
            Err(DecodeError::UnexpectedEof { needed: 4, remaining: 2 })
        ));
    }

    #[test]
    fn rejects_unknown_versions() {
        let config = CodecConfig::pvm();
        let bytes = [0u8, 9];
        assert_eq!(
            Reader::new(&bytes, &config).err(),
            Some(DecodeError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn bounds_slice_lengths() {
        let config = CodecConfig::pvm();
        let bytes = [0u8, 0, 0xff, 0xff, 0xff, 0xff];
        let mut reader = Reader::new(&bytes, &config).unwrap();
        assert!(matches!(reader.bytes(), Err(DecodeError::LengthTooLarge { .. })));
    }
}
