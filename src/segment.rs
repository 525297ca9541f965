use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::version::Version;

/// A segment of character/binary/control data in a QR Code symbol.
///
/// Segments are immutable and are usually created through the factory
/// functions [`make_numeric`](QrSegment::make_numeric),
/// [`make_alphanumeric`](QrSegment::make_alphanumeric),
/// [`make_bytes`](QrSegment::make_bytes) and [`make_eci`](QrSegment::make_eci),
/// or all at once with [`make_segments`](QrSegment::make_segments).
///
/// The mid-level way is to build the bit payload yourself and call
/// [`QrSegment::new`]. Any segment longer than what its count field can hold
/// at a given version is rejected at encode time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<bool>,
}

impl QrSegment {
    /// Returns a segment representing the given binary data encoded in byte mode.
    ///
    /// Any text string can be converted to UTF-8 bytes and encoded as a byte mode segment.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for &b in data {
            for i in (0..8).rev() {
                bb.push(((b >> i) & 1) != 0);
            }
        }
        Self::new(QrSegmentMode::Byte, data.len(), bb.into())
    }

    /// Returns a segment representing the given string of decimal digits encoded in numeric mode.
    ///
    /// Fails with [`QrError::UnencodableCharacter`] on the first non-digit.
    pub fn make_numeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let digit = c.to_digit(10).ok_or(QrError::UnencodableCharacter {
                mode: QrSegmentMode::Numeric,
                character: c,
            })?;
            accumdata = accumdata * 10 + digit;
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10)?;
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 or 2 digits remaining
            bb.append_bits(accumdata, accumcount * 3 + 1)?;
        }
        Ok(Self::new(QrSegmentMode::Numeric, text.len(), bb.into()))
    }

    /// Returns a segment representing the given text string encoded in alphanumeric mode.
    ///
    /// The characters allowed are: 0 to 9, A to Z (uppercase only), space,
    /// dollar, percent, asterisk, plus, hyphen, period, slash, colon.
    pub fn make_alphanumeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u32 = 0;
        for c in text.chars() {
            let i = alphanumeric_index(c).ok_or(QrError::UnencodableCharacter {
                mode: QrSegmentMode::Alphanumeric,
                character: c,
            })?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11)?;
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 character remaining
            bb.append_bits(accumdata, 6)?;
        }
        Ok(Self::new(QrSegmentMode::Alphanumeric, text.len(), bb.into()))
    }

    /// Returns a list of zero or one segments to represent the given Unicode text string.
    ///
    /// The mode is the first of numeric, alphanumeric and byte that can hold
    /// the whole string. Text is never split into mixed-mode segments.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            return Vec::new();
        }
        let seg = if Self::is_numeric(text) {
            Self::make_numeric(text)
        } else if Self::is_alphanumeric(text) {
            Self::make_alphanumeric(text)
        } else {
            Ok(Self::make_bytes(text.as_bytes()))
        };
        match seg {
            Ok(seg) => vec![seg],
            Err(err) => unreachable!("charset was checked before encoding: {err}"),
        }
    }

    /// Returns a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// Values below 2^7 take 8 bits, below 2^14 take 16 bits, and below
    /// 1 000 000 take 24 bits. Larger values are rejected.
    pub fn make_eci(assignval: u32) -> Result<Self> {
        let mut bb = BitBuffer::new();
        if assignval < (1 << 7) {
            bb.append_bits(assignval, 8)?;
        } else if assignval < (1 << 14) {
            bb.append_bits(0b10, 2)?;
            bb.append_bits(assignval, 14)?;
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3)?;
            bb.append_bits(assignval, 21)?;
        } else {
            return Err(QrError::invalid(format!(
                "ECI assignment value {assignval} out of range"
            )));
        }
        Ok(Self::new(QrSegmentMode::Eci, 0, bb.into()))
    }

    /// Creates a new QR Code segment with the given attributes and data.
    ///
    /// The character count must agree with the mode and the bit buffer
    /// length, but the constraint isn't checked.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<bool>) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// The payload bits, without the mode indicator or count field.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Calculates the number of bits needed to encode the given segments at
    /// the given version. Returns `None` if a segment has too many characters
    /// to fit its length field.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            // ccbits can be as large as 16, but usize can be as small as 16
            if let Some(limit) = 1usize.checked_shl(u32::from(ccbits)) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

/// The set of all legal characters in alphanumeric mode,
/// where each character value maps to the index in the string.
static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .find(c)
        .and_then(|i| u32::try_from(i).ok())
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// Returns the 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Returns the bit width of the character count field for a segment in
    /// this mode in a QR Code at the given version number.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[usize::from((ver.value() + 7) / 17)]
    }
}
