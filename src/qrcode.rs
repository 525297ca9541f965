use crate::bits::BitBuffer;
use crate::ecc::{self, QrCodeEcc};
use crate::error::{DataTooLong, QrError, Result};
use crate::matrix::Canvas;
use crate::options::EncodeOptions;
use crate::penalty::penalty_score;
use crate::reed_solomon;
use crate::segment::QrSegment;
use crate::version::{Mask, Version};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40, all four error correction levels,
/// and four encoding modes (numeric, alphanumeric, byte, ECI). Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Build segments with [`QrSegment`] and call [`QrCode::encode_segments_with`]
///   or [`QrCode::encode_segments_advanced`].
/// - Low-level: Compute the data codewords yourself and call [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrforge::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// assert_eq!(qr.size(), qr.version().size());
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    // Scalar parameters:

    /// The version number of this QR Code, which is between 1 and 40 (inclusive).
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    /// The error correction level used in this QR Code.
    errorcorrectionlevel: QrCodeEcc,

    /// The index of the mask pattern used in this QR Code, between 0 and 7.
    mask: Mask,

    // Grid of modules/pixels, row-major:

    /// The modules of this QR Code (false = light, true = dark).
    modules: Vec<bool>,
}

impl QrCode {
    /// Returns a QR Code representing the given Unicode text string at the given error correction level.
    ///
    /// The smallest possible version is automatically chosen. The ECC level of the result
    /// may be higher than `ecl` if it can be done without increasing the version. Text
    /// is encoded in a single numeric, alphanumeric or byte segment.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        QrCode::encode_segments(&segs, ecl)
    }

    /// Returns a QR Code representing the given binary data at the given error correction level.
    ///
    /// This function always encodes using the binary segment mode, not any text mode.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self> {
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)];
        QrCode::encode_segments(&segs, ecl)
    }

    /// Encodes the text at the first error correction level in `ecls` that
    /// fits, e.g. `&[QrCodeEcc::Medium, QrCodeEcc::Low]`.
    ///
    /// Returns the capacity error of the last level tried if none fits.
    pub fn encode_text_with_fallback(text: &str, ecls: &[QrCodeEcc]) -> Result<Self> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        let mut lasterr: Option<QrError> = None;
        for &ecl in ecls {
            match QrCode::encode_segments(&segs, ecl) {
                Ok(qr) => return Ok(qr),
                Err(err @ QrError::DataTooLong(_)) => {
                    log::debug!("text does not fit at {ecl:?}: {err}");
                    lasterr = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(lasterr.unwrap_or_else(|| QrError::invalid("no error correction level to try")))
    }

    /// Returns a QR Code representing the given segments at the given error correction level,
    /// with the default [`EncodeOptions`].
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self> {
        QrCode::encode_segments_with(segs, ecl, &EncodeOptions::default())
    }

    /// Returns a QR Code representing the given segments with the given encoding parameters.
    ///
    /// The smallest possible version within `minversion..=maxversion` is chosen. If
    /// `boostecl` is `true`, the ECC level of the result may be higher than `ecl` if it
    /// can be done without increasing the version. `mask` is `None` for automatic choice
    /// by penalty score, or a fixed pattern.
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self> {
        let options = EncodeOptions {
            min_version: minversion,
            max_version: maxversion,
            mask,
            boost_ecl: boostecl,
        };
        QrCode::encode_segments_with(segs, ecl, &options)
    }

    /// Returns a QR Code representing the given segments, configured by `options`.
    pub fn encode_segments_with(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self> {
        let (datacodewords, ecl, version) =
            QrCode::encode_segments_to_codewords(segs, ecl, options)?;
        QrCode::encode_codewords(version, ecl, &datacodewords, options.mask)
    }

    /// Returns the data codewords for the given segments, together with the
    /// error correction level (possibly boosted) and version they were laid
    /// out for.
    ///
    /// This is the first half of [`QrCode::encode_segments_with`]; pass the
    /// result to [`QrCode::encode_codewords`] to finish the symbol.
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<(Vec<u8>, QrCodeEcc, Version)> {
        options.validate()?;

        // Find the minimal version number to use
        let mut failure = DataTooLong::SegmentTooLong;
        let mut chosen: Option<(Version, usize)> = None;
        for version in options.min_version.up_to(options.max_version) {
            let datacapacitybits: usize = ecc::num_data_codewords(version, ecl) * 8;
            match QrSegment::get_total_bits(segs, version) {
                Some(n) if n <= datacapacitybits => {
                    chosen = Some((version, n));
                    break;
                }
                Some(n) => failure = DataTooLong::DataOverCapacity(n, datacapacitybits),
                None => failure = DataTooLong::SegmentTooLong,
            }
        }
        let (version, datausedbits) = chosen.ok_or(failure)?;

        // Increase the error correction level while the data still fits in the current version number
        if options.boost_ecl {
            for newecl in QrCodeEcc::BOOST_ORDER {
                if datausedbits <= ecc::num_data_codewords(version, newecl) * 8 {
                    ecl = newecl;
                }
            }
        }
        log::debug!(
            "{} segment(s), {datausedbits} bits: version {}, {ecl:?}",
            segs.len(),
            version.value()
        );

        // Concatenate all segments to create the data bit string
        let mut bb = BitBuffer::new();
        for seg in segs {
            let numchars = u32::try_from(seg.num_chars())
                .map_err(|_| QrError::invalid("character count exceeds 32 bits"))?;
            bb.append_bits(seg.mode().mode_bits(), 4)?;
            bb.append_bits(numchars, seg.mode().num_char_count_bits(version))?;
            bb.extend_from_bits(seg.data());
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let datacapacitybits: usize = ecc::num_data_codewords(version, ecl) * 8;
        debug_assert!(bb.len() <= datacapacitybits);
        let numzerobits = core::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8)?;
        let numzerobits = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8)?;
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8)?;
        }

        Ok((bb.to_bytes(), ecl, version))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// Fails if `datacodewords` is not exactly as long as the version and
    /// level require.
    pub fn encode_codewords(
        version: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        msk: Option<Mask>,
    ) -> Result<Self> {
        // Compute ECC, draw modules
        let allcodewords = reed_solomon::add_ecc_and_interleave(datacodewords, version, ecl)?;
        let mut canvas = Canvas::new(version);
        canvas.draw_codewords(&allcodewords)?;

        // Do masking
        let mask = match msk {
            Some(mask) => mask,
            None => QrCode::choose_mask(&mut canvas, ecl),
        };
        canvas.apply_mask(mask);
        canvas.draw_format_bits(ecl, mask);

        Ok(QrCode {
            version,
            size: version.size(),
            errorcorrectionlevel: ecl,
            mask,
            modules: canvas.into_modules(),
        })
    }

    /// Tries every mask on the unmasked canvas and returns the one with the
    /// lowest penalty; the first one wins ties. The canvas is left unmasked.
    fn choose_mask(canvas: &mut Canvas, ecl: QrCodeEcc) -> Mask {
        let mut best = Mask::PLACEHOLDER;
        let mut minpenalty = i32::MAX;
        for mask in Mask::all() {
            canvas.apply_mask(mask);
            canvas.draw_format_bits(ecl, mask);
            let penalty: i32 = penalty_score(canvas.modules(), canvas.size());
            log::trace!("mask {}: penalty {penalty}", mask.value());
            if penalty < minpenalty {
                best = mask;
                minpenalty = penalty;
            }
            canvas.apply_mask(mask); // Undoes the mask due to XOR
        }
        log::debug!("chose mask {} with penalty {minpenalty}", best.value());
        best
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`, so renderers can probe a quiet zone freely.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size + x) as usize]
    }

    /// Number of data bits a symbol of the given version can hold once all
    /// function modules are excluded, remainder bits included.
    pub fn num_raw_data_modules(version: Version) -> usize {
        ecc::num_raw_data_modules(version)
    }

    /// Number of 8-bit data (not ECC) codewords for the given version and level.
    pub fn num_data_codewords(version: Version, ecl: QrCodeEcc) -> usize {
        ecc::num_data_codewords(version, ecl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    fn m(n: u8) -> Mask {
        Mask::new(n).unwrap()
    }

    #[test]
    fn test_hello_world_codewords_1m() {
        let segs = QrSegment::make_segments("HELLO WORLD");
        let options = EncodeOptions::default().boost_ecl(false);
        let (data, ecl, version) =
            QrCode::encode_segments_to_codewords(&segs, QrCodeEcc::Medium, &options).unwrap();
        assert_eq!(version, v(1));
        assert_eq!(ecl, QrCodeEcc::Medium);
        assert_eq!(
            data,
            vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
        );
    }

    #[test]
    fn test_empty_input_is_all_padding() {
        let options = EncodeOptions::default().boost_ecl(false);
        let (data, _, version) =
            QrCode::encode_segments_to_codewords(&[], QrCodeEcc::Medium, &options).unwrap();
        assert_eq!(version, v(1));
        // Terminator fills the first half byte, then the pad bytes alternate.
        let mut expected = vec![0x00];
        expected.extend([0xec, 0x11].iter().cycle().take(15));
        assert_eq!(data, expected);
    }

    #[test]
    fn test_terminator_clipped_to_capacity() {
        // 19 bytes at 1-L: 4 + 8 + 8 * 17 = 148 bits, 4 bits left for the terminator.
        let segs = [QrSegment::make_bytes(&[0xff; 17])];
        let options = EncodeOptions::default().boost_ecl(false);
        let (data, _, version) =
            QrCode::encode_segments_to_codewords(&segs, QrCodeEcc::Low, &options).unwrap();
        assert_eq!(version, v(1));
        assert_eq!(data.len(), 19);
        assert_eq!(data[0], 0x41);
        assert_eq!(data[18], 0xf0);
    }

    #[test]
    fn test_boost_ecl_only_when_it_fits() {
        let segs = QrSegment::make_segments("HELLO WORLD");
        let boosted = QrCode::encode_segments(&segs, QrCodeEcc::Low).unwrap();
        assert_eq!(boosted.error_correction_level(), QrCodeEcc::Quartile);
        assert_eq!(boosted.version(), v(1));

        let plain = QrCode::encode_segments_advanced(
            &segs,
            QrCodeEcc::Low,
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
        .unwrap();
        assert_eq!(plain.error_correction_level(), QrCodeEcc::Low);
    }

    #[test]
    fn test_min_version_is_respected() {
        let options = EncodeOptions::default().min_version(v(7));
        let qr = QrCode::encode_segments_with(
            &QrSegment::make_segments("HELLO WORLD"),
            QrCodeEcc::Low,
            &options,
        )
        .unwrap();
        assert_eq!(qr.version(), v(7));
        assert_eq!(qr.size(), 45);
        assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
    }

    #[test]
    fn test_max_version_limits_search() {
        let options = EncodeOptions::default().max_version(v(1)).boost_ecl(false);
        let segs = [QrSegment::make_bytes(&[0u8; 18])];
        let err = QrCode::encode_segments_with(&segs, QrCodeEcc::Low, &options).unwrap_err();
        assert_eq!(
            err,
            QrError::DataTooLong(DataTooLong::DataOverCapacity(156, 152))
        );
    }

    #[test]
    fn test_segment_too_long_for_every_version() {
        let options = EncodeOptions::default().max_version(v(9));
        let segs = [QrSegment::make_bytes(&[0u8; 256])];
        assert_eq!(
            QrCode::encode_segments_with(&segs, QrCodeEcc::Low, &options),
            Err(QrError::DataTooLong(DataTooLong::SegmentTooLong))
        );
    }

    #[test]
    fn test_forced_mask_3_applies_formula_to_data_modules() {
        let segs = QrSegment::make_segments("HELLO WORLD");
        let encode = |mask| {
            QrCode::encode_segments_advanced(
                &segs,
                QrCodeEcc::Low,
                Version::MIN,
                Version::MAX,
                Some(mask),
                true,
            )
            .unwrap()
        };
        let masked = encode(m(3));
        let reference = encode(m(0));
        assert_eq!(masked.mask(), m(3));

        let canvas = Canvas::new(masked.version());
        for y in 0..masked.size() {
            for x in 0..masked.size() {
                if canvas.is_function(x, y) {
                    continue;
                }
                let diff = masked.get_module(x, y) ^ reference.get_module(x, y);
                assert_eq!(diff, ((x + y) % 3 == 0) ^ ((x + y) % 2 == 0), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_auto_mask_is_deterministic() {
        let a = QrCode::encode_text("Hello, world!", QrCodeEcc::Low).unwrap();
        let b = QrCode::encode_text("Hello, world!", QrCodeEcc::Low).unwrap();
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a, b);
        assert_eq!(a.mask(), m(2));
    }

    #[test]
    fn test_auto_mask_has_minimal_penalty() {
        let digits = "314159265358979323846264338327950288419716939937510";
        let qr = QrCode::encode_text(digits, QrCodeEcc::Medium).unwrap();
        assert_eq!(qr.mask(), m(3));
        let size = qr.size();
        let modules_with = |mask| {
            let forced = QrCode::encode_segments_advanced(
                &QrSegment::make_segments(digits),
                qr.error_correction_level(),
                qr.version(),
                qr.version(),
                Some(mask),
                false,
            )
            .unwrap();
            forced.modules
        };
        let chosen = penalty_score(&qr.modules, size);
        for mask in Mask::all() {
            let penalty = penalty_score(&modules_with(mask), size);
            assert!(chosen <= penalty, "mask {} beats chosen", mask.value());
            if mask < qr.mask() {
                assert!(chosen < penalty, "earlier mask {} ties", mask.value());
            }
        }
    }

    #[test]
    fn test_dark_count_splits_into_function_and_data_modules() {
        let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
        let canvas = Canvas::new(qr.version());
        let size = qr.size();
        let mut function_dark = 0;
        let mut data_dark = 0;
        for y in 0..size {
            for x in 0..size {
                match (canvas.is_function(x, y), qr.get_module(x, y)) {
                    (true, true) => function_dark += 1,
                    (false, true) => data_dark += 1,
                    _ => {}
                }
            }
        }
        let dark = qr.modules.iter().filter(|&&b| b).count();
        assert_eq!(function_dark + data_dark, dark);
        assert_eq!(dark, 218);
    }

    #[test]
    fn test_encode_codewords_rejects_wrong_length() {
        assert!(matches!(
            QrCode::encode_codewords(v(1), QrCodeEcc::Low, &[0u8; 20], None),
            Err(QrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_segments_rejects_inverted_range() {
        let err = QrCode::encode_segments_advanced(&[], QrCodeEcc::Low, v(5), v(4), None, true)
            .unwrap_err();
        assert!(matches!(err, QrError::InvalidArgument(_)));
    }

    #[test]
    fn test_fallback_tries_next_level() {
        // Byte mode holds at most 2331 bytes at MEDIUM.
        let text = "a".repeat(2400);
        let qr = QrCode::encode_text_with_fallback(&text, &[QrCodeEcc::Medium, QrCodeEcc::Low])
            .unwrap();
        assert_eq!(qr.version(), v(36));
        assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);

        let short = QrCode::encode_text_with_fallback("hi", &[QrCodeEcc::Medium, QrCodeEcc::Low])
            .unwrap();
        assert!(short.error_correction_level() >= QrCodeEcc::Medium);
    }

    #[test]
    fn test_fallback_reports_last_capacity_error() {
        let text = "a".repeat(3000);
        let err = QrCode::encode_text_with_fallback(&text, &[QrCodeEcc::Medium, QrCodeEcc::Low])
            .unwrap_err();
        assert!(matches!(err, QrError::DataTooLong(_)));
        assert!(matches!(
            QrCode::encode_text_with_fallback("hi", &[]),
            Err(QrError::InvalidArgument(_))
        ));
    }
}
