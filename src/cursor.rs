//! Frame Cursor
//!
//! Sequential, bounds-checked reads over the bytes of one captured frame.
//! The cursor owns its read position and fails explicitly instead of reading
//! out of bounds, so decoders never need to pre-check remaining length
//! before each field read.

/// Error returned when a read runs past the end of the captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Truncated;

impl core::fmt::Display for Truncated {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame truncated before expected field")
    }
}

/// Sequential byte reader over one captured frame.
///
/// Each read advances the position. The remainder that has not been decoded
/// yet is always available through [`FrameCursor::rest`], which is what the
/// hexdump fallback renders when decoding aborts.
#[derive(Debug, Clone, Copy)]
pub struct FrameCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read one byte and advance the position
    ///
    /// # Errors
    /// Returns [`Truncated`] if no bytes remain
    pub fn read_u8(&mut self) -> Result<u8, Truncated> {
        let byte = *self.data.get(self.pos).ok_or(Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Number of bytes left to read
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether all bytes have been consumed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Undecoded remainder of the frame
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Current read position within the frame
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let mut cursor = FrameCursor::new(&[0x01, 0x02, 0x03]);
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.read_u8(), Ok(0x01));
        assert_eq!(cursor.read_u8(), Ok(0x02));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.rest(), &[0x03]);
        assert_eq!(cursor.read_u8(), Ok(0x03));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut cursor = FrameCursor::new(&[0xAA]);
        assert_eq!(cursor.read_u8(), Ok(0xAA));
        assert_eq!(cursor.read_u8(), Err(Truncated));
        // Position is unchanged by a failed read
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u8(), Err(Truncated));
    }

    #[test]
    fn test_empty_frame() {
        let mut cursor = FrameCursor::new(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.rest(), &[] as &[u8]);
        assert_eq!(cursor.read_u8(), Err(Truncated));
    }
}
