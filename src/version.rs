use crate::error::{QrError, Result};

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// Fails if the number is outside the range [1, 40].
    pub fn new(ver: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(QrError::invalid(format!("version {ver} out of range [1, 40]")))
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules: `version * 4 + 17`.
    pub const fn size(self) -> i32 {
        self.0 as i32 * 4 + 17
    }

    /// All versions from `self` up to and including `last`.
    pub(crate) fn up_to(self, last: Version) -> impl Iterator<Item = Version> {
        (self.0..=last.0).map(Self)
    }
}

impl TryFrom<u8> for Version {
    type Error = QrError;

    fn try_from(ver: u8) -> Result<Self> {
        Self::new(ver)
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// Fails if the number is outside the range [0, 7].
    pub fn new(mask: u8) -> Result<Self> {
        if mask <= 7 {
            Ok(Self(mask))
        } else {
            Err(QrError::invalid(format!("mask {mask} out of range [0, 7]")))
        }
    }

    /// Interprets a mask override where `-1` means "choose automatically".
    ///
    /// ```
    /// use qrforge::Mask;
    ///
    /// assert_eq!(Mask::from_override(-1).unwrap(), None);
    /// assert_eq!(Mask::from_override(3).unwrap().map(Mask::value), Some(3));
    /// assert!(Mask::from_override(8).is_err());
    /// ```
    pub fn from_override(value: i32) -> Result<Option<Self>> {
        match value {
            -1 => Ok(None),
            0..=7 => Ok(Some(Self(value as u8))),
            _ => Err(QrError::invalid(format!(
                "mask override {value} out of range [-1, 7]"
            ))),
        }
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Written into the format area before the real mask is known.
    pub(crate) const PLACEHOLDER: Mask = Mask(0);

    pub(crate) fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Self)
    }

    /// Whether this mask inverts the module at (x, y).
    pub(crate) fn inverts(self, x: i32, y: i32) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => x * y % 2 + x * y % 3 == 0,
            6 => (x * y % 2 + x * y % 3) % 2 == 0,
            7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(mask: u8) -> Result<Self> {
        Self::new(mask)
    }
}
