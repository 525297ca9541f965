use crate::version::Version;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Table index of this level, in the range 0 to 3 (Low to High).
    pub fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value written into the format information.
    pub fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    /// Levels tried, in order, when boosting error correction for free.
    pub(crate) const BOOST_ORDER: [QrCodeEcc; 3] =
        [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High];
}

/// How the codewords of one (version, level) pair split into blocks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct BlockLayout {
    pub num_blocks: usize,
    pub ecc_len: usize,
    pub raw_codewords: usize,
    pub num_short_blocks: usize,
    /// Data codewords in a short block; long blocks hold one more.
    pub short_data_len: usize,
}

impl BlockLayout {
    pub fn new(ver: Version, ecl: QrCodeEcc) -> Self {
        let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let ecc_len = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let raw_codewords = num_raw_data_modules(ver) / 8;
        Self {
            num_blocks,
            ecc_len,
            raw_codewords,
            num_short_blocks: num_blocks - raw_codewords % num_blocks,
            short_data_len: raw_codewords / num_blocks - ecc_len,
        }
    }

    pub fn data_len(&self, block: usize) -> usize {
        self.short_data_len + usize::from(block >= self.num_short_blocks)
    }
}

/// Number of data bits that can be stored in a QR Code of the given version,
/// after all function modules are excluded. Includes remainder bits, so it
/// might not be a multiple of 8. The result is in the range [208, 29648].
pub(crate) fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    debug_assert!((208..=29648).contains(&result));
    result
}

/// Number of 8-bit data (not ECC) codewords for the given version and level,
/// with remainder bits discarded.
pub(crate) fn num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
    num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
            * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28,
        30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30,
        24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_raw_data_modules() {
        assert_eq!(num_raw_data_modules(v(1)), 208);
        assert_eq!(num_raw_data_modules(v(2)), 359);
        assert_eq!(num_raw_data_modules(v(7)), 1568);
        assert_eq!(num_raw_data_modules(v(32)), 19723);
        assert_eq!(num_raw_data_modules(v(40)), 29648);
    }

    #[test]
    fn test_data_codewords() {
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::Low), 19);
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::High), 9);
        assert_eq!(num_data_codewords(v(14), QrCodeEcc::Low), 461);
        assert_eq!(num_data_codewords(v(40), QrCodeEcc::Low), 2956);
        assert_eq!(num_data_codewords(v(40), QrCodeEcc::High), 1276);
    }

    #[test]
    fn test_block_layout_sums_to_raw_codewords() {
        for ver in Version::MIN.up_to(Version::MAX) {
            for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
                let layout = BlockLayout::new(ver, ecl);
                let data: usize = (0..layout.num_blocks).map(|i| layout.data_len(i)).sum();
                assert_eq!(data, num_data_codewords(ver, ecl));
                assert_eq!(
                    data + layout.num_blocks * layout.ecc_len,
                    layout.raw_codewords
                );
            }
        }
    }

    #[test]
    fn test_format_bits_are_distinct() {
        let mut bits: Vec<u8> = [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High]
            .iter()
            .map(|e| e.format_bits())
            .collect();
        bits.sort_unstable();
        assert_eq!(bits, vec![0, 1, 2, 3]);
    }
}
