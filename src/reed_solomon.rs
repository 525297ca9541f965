//! Reed-Solomon error correction over GF(2^8/0x11D).
//!
//! The divisor polynomial is stored as its coefficients from highest to lowest
//! power, excluding the leading term which is always 1. For example the
//! polynomial x^3 + 255x^2 + 8x + 93 is stored as `[255, 8, 93]`.

use crate::ecc::{BlockLayout, QrCodeEcc, num_data_codewords};
use crate::error::{QrError, Result};
use crate::version::Version;

/// Returns the product of the two given field elements modulo GF(2^8/0x11D).
///
/// Operands are bytes, so the "operand exceeds a byte" failure of a loosely
/// typed interface cannot occur here.
pub fn multiply(x: u8, y: u8) -> u8 {
    // Russian peasant multiplication
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

/// Returns a Reed-Solomon ECC generator polynomial for the given degree.
///
/// The polynomial is the product (x - r^0)(x - r^1)...(x - r^{degree-1})
/// where r = 0x02 is a generator element of the field. Fails unless
/// `degree` is in [1, 255].
pub fn compute_divisor(degree: usize) -> Result<Vec<u8>> {
    if !(1..=255).contains(&degree) {
        return Err(QrError::invalid(format!(
            "Reed-Solomon degree {degree} out of range [1, 255]"
        )));
    }
    // Start off with the monomial x^0
    let mut result = vec![0u8; degree - 1];
    result.push(1);

    // Multiply by (x - r^i) for each root, dropping the implicit leading term.
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            result[j] = multiply(result[j], root);
            if j + 1 < result.len() {
                result[j] ^= result[j + 1];
            }
        }
        root = multiply(root, 0x02);
    }
    Ok(result)
}

/// Returns the remainder of `data` divided by `divisor`, i.e. the ECC bytes.
/// The result always has `divisor.len()` entries.
pub fn compute_remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; divisor.len()];
    for b in data {
        let factor: u8 = b ^ result[0];
        result.remove(0);
        result.push(0);
        for (x, &y) in result.iter_mut().zip(divisor.iter()) {
            *x ^= multiply(y, factor);
        }
    }
    result
}

/// Splits the data codewords into blocks, appends ECC to each block and
/// interleaves the bytes of all blocks into the final raw codeword sequence.
///
/// Fails if `data` does not hold exactly the number of data codewords that
/// the version and level prescribe.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Result<Vec<u8>> {
    let expected = num_data_codewords(ver, ecl);
    if data.len() != expected {
        return Err(QrError::invalid(format!(
            "expected {expected} data codewords for version {} {ecl:?}, got {}",
            ver.value(),
            data.len()
        )));
    }
    let layout = BlockLayout::new(ver, ecl);
    let divisor = compute_divisor(layout.ecc_len)?;
    let mut result = vec![0u8; layout.raw_codewords];

    let mut dat: &[u8] = data;
    for i in 0..layout.num_blocks {
        let datlen = layout.data_len(i);
        let (block, rest) = dat.split_at(datlen);
        let ecc = compute_remainder(block, &divisor);

        // Short blocks skip the column where only long blocks have a byte.
        let mut k: usize = i;
        for (j, &b) in block.iter().enumerate() {
            if j == layout.short_data_len {
                k -= layout.num_short_blocks;
            }
            result[k] = b;
            k += layout.num_blocks;
        }
        let mut k: usize = data.len() + i;
        for &b in &ecc {
            result[k] = b;
            k += layout.num_blocks;
        }
        dat = rest;
    }
    debug_assert!(dat.is_empty());
    Ok(result)
}
