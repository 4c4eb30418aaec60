//! Integer layouts for contiguous reads and writes.

use crate::error::{CursorError, Result, Violation};

/// Byte order of a multi-byte integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Width, signedness and byte order of an encoded integer.
///
/// Only 1, 2 and 4 byte widths are supported; anything else fails with
/// [`Violation::UnsupportedWidth`] instead of truncating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntLayout {
    pub byte_length: usize,
    pub signed: bool,
    pub endian: Endian,
}

impl IntLayout {
    pub const U8: Self = Self::new(1, false, Endian::Little);
    pub const I8: Self = Self::new(1, true, Endian::Little);
    pub const U16_LE: Self = Self::new(2, false, Endian::Little);
    pub const U16_BE: Self = Self::new(2, false, Endian::Big);
    pub const I16_LE: Self = Self::new(2, true, Endian::Little);
    pub const I16_BE: Self = Self::new(2, true, Endian::Big);
    pub const U32_LE: Self = Self::new(4, false, Endian::Little);
    pub const U32_BE: Self = Self::new(4, false, Endian::Big);
    pub const I32_LE: Self = Self::new(4, true, Endian::Little);
    pub const I32_BE: Self = Self::new(4, true, Endian::Big);

    #[must_use]
    pub const fn new(byte_length: usize, signed: bool, endian: Endian) -> Self {
        Self { byte_length, signed, endian }
    }

    /// The validated byte width.
    ///
    /// # Errors
    ///
    /// [`Violation::UnsupportedWidth`] for widths other than 1, 2 or 4.
    pub fn width(&self, operation: &'static str) -> Result<usize> {
        match self.byte_length {
            1 | 2 | 4 => Ok(self.byte_length),
            other => Err(CursorError::precondition(operation, Violation::UnsupportedWidth(other))),
        }
    }

    /// Smallest and largest value the layout can hold.
    fn range(width: usize, signed: bool) -> (i64, i64) {
        let bits = 8 * width as u32;
        if signed {
            let half = 1i64 << (bits - 1);
            (-half, half - 1)
        } else {
            (0, (1i64 << bits) - 1)
        }
    }

    /// The validated width, after checking that `value` fits the layout.
    ///
    /// # Errors
    ///
    /// [`Violation::UnsupportedWidth`] or [`Violation::ValueOutOfRange`].
    pub fn fits(&self, value: i64, operation: &'static str) -> Result<usize> {
        let width = self.width(operation)?;
        let (min, max) = Self::range(width, self.signed);
        if value < min || value > max {
            return Err(CursorError::precondition(
                operation,
                Violation::ValueOutOfRange { value, width },
            ));
        }
        Ok(width)
    }

    /// Decodes the integer starting at `offset` of `bytes`.
    pub(crate) fn decode(&self, bytes: &[u8], offset: usize, operation: &'static str) -> Result<i64> {
        let width = self.width(operation)?;
        let span = span(offset, width, bytes.len(), operation)?;

        let mut raw = [0u8; 8];
        raw[..width].copy_from_slice(&bytes[span]);
        if self.endian == Endian::Big {
            raw[..width].reverse();
        }
        let unsigned = u64::from_le_bytes(raw);

        if self.signed {
            let shift = 64 - 8 * width as u32;
            Ok(((unsigned << shift) as i64) >> shift)
        } else {
            Ok(unsigned as i64)
        }
    }

    /// Encodes `value` into `bytes` starting at `offset`.
    ///
    /// `bytes` must already cover the written span; nothing is written on error.
    pub(crate) fn encode(
        &self,
        bytes: &mut [u8],
        offset: usize,
        value: i64,
        operation: &'static str,
    ) -> Result<()> {
        let width = self.fits(value, operation)?;
        let span = span(offset, width, bytes.len(), operation)?;

        let mut raw = (value as u64).to_le_bytes();
        if self.endian == Endian::Big {
            raw[..width].reverse();
        }
        bytes[span].copy_from_slice(&raw[..width]);
        Ok(())
    }
}

fn span(
    offset: usize,
    width: usize,
    len: usize,
    operation: &'static str,
) -> Result<core::ops::Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(CursorError::precondition(
            operation,
            Violation::OffsetOutOfBounds { offset, width, len },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_byte_orders() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(IntLayout::U32_BE.decode(&bytes, 0, "t").unwrap(), 0x0102_0304);
        assert_eq!(IntLayout::U32_LE.decode(&bytes, 0, "t").unwrap(), 0x0403_0201);
        assert_eq!(IntLayout::U16_BE.decode(&bytes, 2, "t").unwrap(), 0x0304);
    }

    #[test]
    fn sign_extends_signed_layouts() {
        let bytes = [0xff, 0xfe];
        assert_eq!(IntLayout::I8.decode(&bytes, 0, "t").unwrap(), -1);
        assert_eq!(IntLayout::U8.decode(&bytes, 0, "t").unwrap(), 255);
        assert_eq!(IntLayout::I16_LE.decode(&bytes, 0, "t").unwrap(), -257);
    }

    #[test]
    fn rejects_odd_widths() {
        let layout = IntLayout::new(3, false, Endian::Little);
        let err = layout.decode(&[0; 8], 0, "read_at").unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::UnsupportedWidth(3)));
        let err = IntLayout::new(8, true, Endian::Big).width("w").unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::UnsupportedWidth(8)));
    }

    #[test]
    fn bounds_are_checked_before_reading() {
        let err = IntLayout::U32_LE.decode(&[0; 5], 2, "read_at").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::OffsetOutOfBounds { offset: 2, width: 4, len: 5 })
        );
    }

    #[test]
    fn encode_checks_range_and_leaves_bytes_alone_on_error() {
        let mut bytes = [0u8; 2];
        let err = IntLayout::U8.encode(&mut bytes, 0, 256, "write_int").unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ValueOutOfRange { value: 256, width: 1 }));
        let err = IntLayout::I8.encode(&mut bytes, 0, -129, "write_int").unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ValueOutOfRange { value: -129, width: 1 }));
        assert_eq!(bytes, [0, 0]);

        IntLayout::I16_BE.encode(&mut bytes, 0, -2, "write_int").unwrap();
        assert_eq!(bytes, [0xff, 0xfe]);
    }
}
