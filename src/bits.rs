use crate::error::{QrError, Result};

/// An appendable sequence of bits (0s and 1s).
///
/// Mainly used by [`QrSegment`](crate::QrSegment) and the top-level encoder to
/// accumulate segment headers and payloads before they are packed into
/// codewords.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer(Vec<bool>);

impl BitBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Appends the low `len` bits of `val`, most significant bit first.
    ///
    /// Fails if `len > 31` or if `val` has a bit set at or above position `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) -> Result<()> {
        if len > 31 || (val >> len) != 0 {
            return Err(QrError::invalid(format!(
                "value {val:#x} out of range for {len}-bit field"
            )));
        }
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
        Ok(())
    }

    pub(crate) fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub(crate) fn extend_from_bits(&mut self, bits: &[bool]) {
        self.0.extend_from_slice(bits);
    }

    /// Packs the bits into bytes, most significant bit first. A trailing
    /// partial byte is padded with zero bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = vec![0u8; self.0.len().div_ceil(8)];
        for (i, &bit) in self.0.iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

impl From<BitBuffer> for Vec<bool> {
    fn from(bb: BitBuffer) -> Self {
        bb.0
    }
}

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b101, 3).unwrap();
        bb.append_bits(0, 0).unwrap();
        bb.append_bits(1, 1).unwrap();
        assert_eq!(bb.bits(), &[true, false, true, true]);
    }

    #[test]
    fn test_append_bits_rejects_wide_values() {
        let mut bb = BitBuffer::new();
        assert!(matches!(bb.append_bits(4, 2), Err(QrError::InvalidArgument(_))));
        assert!(matches!(bb.append_bits(0, 32), Err(QrError::InvalidArgument(_))));
        assert!(bb.is_empty());
    }

    #[test]
    fn test_append_bits_max_width() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0x7fff_ffff, 31).unwrap();
        assert_eq!(bb.len(), 31);
        assert!(bb.bits().iter().all(|&b| b));
    }

    #[test]
    fn test_to_bytes_pads_last_byte() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0xec, 8).unwrap();
        bb.append_bits(0b11, 2).unwrap();
        assert_eq!(bb.to_bytes(), vec![0xec, 0xc0]);
    }
}
