//! Construction canvas for a symbol.
//!
//! A [`Canvas`] carries the module grid together with a parallel grid that
//! marks function modules (finders, timing, alignment, format and version
//! information). Codeword placement and masking only ever touch cells that
//! are not function modules. Once the symbol is finished the function grid
//! is dropped and only the modules survive in the [`QrCode`](crate::QrCode).

use crate::bits::get_bit;
use crate::ecc::{num_raw_data_modules, QrCodeEcc};
use crate::error::{QrError, Result};
use crate::version::{Mask, Version};

pub(crate) struct Canvas {
    version: Version,
    size: i32,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl Canvas {
    /// Creates a canvas with all function patterns drawn. The format area
    /// holds a placeholder until [`Canvas::draw_format_bits`] is called.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let cells = (size * size) as usize;
        let mut result = Self {
            version,
            size,
            modules: vec![false; cells],
            isfunction: vec![false; cells],
        };
        result.draw_function_patterns();
        result
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<bool> {
        self.modules
    }

    #[cfg(test)]
    pub(crate) fn is_function(&self, x: i32, y: i32) -> bool {
        self.isfunction[self.index(x, y)]
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!((0..self.size).contains(&x) && (0..self.size).contains(&y));
        (y * self.size + x) as usize
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.isfunction[i] = true;
    }

    fn draw_function_patterns(&mut self) {
        // Timing patterns
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Three finder patterns (all corners except bottom right), with separators
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Alignment patterns, skipping the three finder corners
        let alignpatpos = alignment_pattern_positions(self.version);
        let numalign = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                let corner = (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0);
                if !corner {
                    self.draw_alignment_pattern(pos0, pos1);
                }
            }
        }

        // Dummy format bits reserve the area; the real ones come after masking.
        self.draw_format_bits(QrCodeEcc::Medium, Mask::PLACEHOLDER);
        self.draw_version();
    }

    /// Draws a 9*9 finder pattern including the border separator,
    /// with the center module at (x, y). Modules can be out of bounds.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx = x + dx;
                let yy = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs()); // Chebyshev/infinity norm
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// Draws a 5*5 alignment pattern, with the center module at (x, y).
    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Draws two copies of the version bits (with its own error correction
    /// code), based on this canvas's version. Versions below 7 have none.
    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits = version_bits(self.version);
        for i in 0u8..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i32::from(i % 3);
            let b = i32::from(i / 3);
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Draws two copies of the format bits (with its own error correction
    /// code) for the given level and mask.
    pub fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        let bits = format_bits(ecl, mask);

        // First copy
        for i in 0..6 {
            self.set_function_module(8, i32::from(i), get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i32::from(i), 8, get_bit(bits, i));
        }

        // Second copy
        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i32::from(i), 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i32::from(i), get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    /// Draws the given raw codewords (data and ECC, interleaved) onto the
    /// non-function modules in zig-zag order. Fails unless exactly
    /// `raw data modules / 8` codewords are given.
    pub fn draw_codewords(&mut self, data: &[u8]) -> Result<()> {
        let expected = num_raw_data_modules(self.version) / 8;
        if data.len() != expected {
            return Err(QrError::invalid(format!(
                "expected {expected} raw codewords for version {}, got {}",
                self.version.value(),
                data.len()
            )));
        }

        let size = self.size;
        let mut i: usize = 0; // Bit index into the data
        let mut right: i32 = size - 1; // Index of right column in each column pair
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                for j in 0..2 {
                    let x = right - j;
                    let y = if upward { size - 1 - vert } else { vert };
                    let idx = self.index(x, y);
                    if !self.isfunction[idx] && i < data.len() * 8 {
                        self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - (i & 7) as u8);
                        i += 1;
                    }
                    // Remainder bits (0 to 7) stay light, as initialized.
                }
            }
            right -= 2;
        }
        assert_eq!(i, data.len() * 8, "every codeword bit must be placed");
        Ok(())
    }

    /// XORs the mask pattern onto every non-function module. Applying the
    /// same mask twice restores the original grid.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if !self.isfunction[idx] && mask.inverts(x, y) {
                    self.modules[idx] = !self.modules[idx];
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }
}

/// The 15-bit format word: 2 bits of level, 3 bits of mask, a 10-bit BCH
/// remainder (generator 0x537), XORed with 0x5412.
pub(crate) fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = ((data << 10) | rem) ^ 0x5412;
    debug_assert_eq!(bits >> 15, 0);
    bits
}

/// The 18-bit version word: 6 bits of version and a 12-bit BCH remainder
/// (generator 0x1F25).
pub(crate) fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    let bits = (ver << 12) | rem;
    debug_assert_eq!(bits >> 18, 0);
    bits
}

/// Returns an ascending list of positions of alignment patterns for this
/// version number. Each position is in the range [0,177), and are used on
/// both the x and y axes. Version 1 has none.
pub(crate) fn alignment_pattern_positions(ver: Version) -> Vec<i32> {
    let ver = i32::from(ver.value());
    if ver == 1 {
        return Vec::new();
    }
    let numalign = ver / 7 + 2;
    let step: i32 = if ver == 32 {
        26
    } else {
        (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
    };
    let size = ver * 4 + 17;
    let mut result: Vec<i32> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}
