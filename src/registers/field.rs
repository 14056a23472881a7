//! Declarative register field descriptors
//!
//! Every bit-packed setting of the chip is described once as a [`Field`]: the register address,
//! the offset of its least significant bit and its width. Register types compose their raw
//! bytes from these descriptors instead of repeating shift and mask literals.

use crate::Error;

/// A contiguous group of bits inside one 8-bit register.
///
/// `offset + width` never exceeds 8. Constructing a field that would is rejected during
/// constant evaluation, so a bad descriptor fails the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    address: u8,
    offset: u8,
    width: u8,
}

impl Field {
    /// Describes `width` bits starting at bit `offset` of the register at `address`.
    pub const fn new(address: u8, offset: u8, width: u8) -> Self {
        assert!(width >= 1 && width <= 8, "field width must be 1..=8");
        assert!(offset + width <= 8, "field exceeds register");
        Self {
            address,
            offset,
            width,
        }
    }

    /// Describes a field covering the whole register.
    pub const fn full(address: u8) -> Self {
        Self::new(address, 0, 8)
    }

    /// Register address holding the field
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Position of the field's least significant bit
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Number of bits
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Largest value the field can hold
    pub const fn max(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Bits of the register occupied by the field
    pub const fn mask(&self) -> u8 {
        self.max() << self.offset
    }

    /// Extracts the field value from a raw register byte.
    pub const fn extract(&self, raw: u8) -> u8 {
        (raw & self.mask()) >> self.offset
    }

    /// Extracts a single-bit field as a flag.
    pub const fn is_set(&self, raw: u8) -> bool {
        self.extract(raw) != 0
    }

    /// Replaces the field inside `raw`, leaving every other bit untouched.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `value` does not fit in the field
    pub fn insert(&self, raw: u8, value: u8) -> Result<u8, Error> {
        if value > self.max() {
            return Err(Error::InvalidParameter);
        }
        Ok((raw & !self.mask()) | (value << self.offset))
    }

    /// Replaces a single-bit field inside `raw`.
    pub fn insert_flag(&self, raw: u8, set: bool) -> u8 {
        (raw & !self.mask()) | ((set as u8) << self.offset)
    }

    /// True when both fields live in the same register and share at least one bit.
    pub const fn overlaps(&self, other: &Field) -> bool {
        self.address == other.address && self.mask() & other.mask() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIBBLE: Field = Field::new(0x1D, 4, 4);
    const FLAG: Field = Field::new(0x1D, 0, 1);

    #[test]
    fn mask_and_max() {
        assert_eq!(NIBBLE.mask(), 0xF0);
        assert_eq!(NIBBLE.max(), 0x0F);
        assert_eq!(FLAG.mask(), 0x01);
        assert_eq!(Field::full(0x39).mask(), 0xFF);
        assert_eq!(Field::full(0x39).max(), 0xFF);
    }

    #[test]
    fn insert_preserves_neighbours() {
        let raw = NIBBLE.insert(0x0B, 0x7).unwrap();
        assert_eq!(raw, 0x7B);
        assert_eq!(NIBBLE.extract(raw), 0x7);
        assert_eq!(FLAG.extract(raw), 1);
    }

    #[test]
    fn insert_rejects_oversized_value() {
        assert_eq!(NIBBLE.insert(0x00, 0x10), Err(Error::InvalidParameter));
        assert_eq!(FLAG.insert(0x00, 2), Err(Error::InvalidParameter));
    }

    #[test]
    fn flags() {
        assert!(FLAG.is_set(0xFF));
        assert_eq!(FLAG.insert_flag(0xFF, false), 0xFE);
        assert_eq!(FLAG.insert_flag(0x00, true), 0x01);
    }

    #[test]
    fn overlap_detection() {
        assert!(!NIBBLE.overlaps(&FLAG));
        assert!(NIBBLE.overlaps(&Field::new(0x1D, 3, 2)));
        assert!(!NIBBLE.overlaps(&Field::new(0x1E, 4, 4)));
    }
}
