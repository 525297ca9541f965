use crate::error::{QrError, Result};
use crate::version::{Mask, Version};

/// Knobs for [`QrCode::encode_segments_with`](crate::QrCode::encode_segments_with).
///
/// The defaults search every version, pick the mask automatically and boost
/// the error correction level whenever that costs no extra space.
///
/// ```
/// use qrforge::{EncodeOptions, Mask, Version};
///
/// let options = EncodeOptions::default()
///     .min_version(Version::new(5).unwrap())
///     .mask(Mask::new(2).unwrap())
///     .boost_ecl(false);
/// assert_eq!(options.max_version, Version::MAX);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    /// Smallest version the encoder may pick.
    pub min_version: Version,
    /// Largest version the encoder may pick.
    pub max_version: Version,
    /// Forced mask, or `None` to choose by penalty score.
    pub mask: Option<Mask>,
    /// Raise the error correction level while the data still fits.
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    pub fn max_version(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn auto_mask(mut self) -> Self {
        self.mask = None;
        self
    }

    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    /// Checks that the version range is not empty.
    pub fn validate(&self) -> Result<()> {
        if self.min_version > self.max_version {
            return Err(QrError::invalid(format!(
                "min version {} exceeds max version {}",
                self.min_version.value(),
                self.max_version.value()
            )));
        }
        Ok(())
    }
}
