//! Bounds-checked binary reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary reader over a borrowed byte slice.
///
/// Every read is bounds-checked: running past the end of the slice returns
/// [`BufferError::EndOfBuffer`] and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use nbt_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.u16(), Ok(0x0203));
/// assert!(reader.u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Returns `true` once every byte has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    pub fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.remaining();
        if n > remaining {
            Err(BufferError::EndOfBuffer {
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.take::<1>()?[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(i8::from_be_bytes(self.take()?))
    }

    /// Reads an unsigned 16-bit big-endian integer.
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    /// Reads a signed 16-bit big-endian integer.
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    /// Reads a signed 32-bit big-endian integer.
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    /// Reads a signed 64-bit big-endian integer.
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    /// Reads a 32-bit big-endian IEEE-754 float.
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_be_bytes(self.take()?))
    }

    /// Reads a 64-bit big-endian IEEE-754 float.
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_be_bytes(self.take()?))
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        let bin = &self.uint8[x..end];
        self.x = end;
        Ok(bin)
    }

    /// Reads a UTF-8 string of `size` bytes.
    ///
    /// Bounds are checked before the bytes are validated, so a short buffer
    /// always reports [`BufferError::EndOfBuffer`]. On invalid UTF-8 the
    /// cursor is left at the start of the string.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let s = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.x += size;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let data = [
            0xff, // i8
            0x80, 0x00, // i16
            0x00, 0x00, 0x01, 0x00, // i32
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2a, // i64
        ];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i8(), Ok(-1));
        assert_eq!(reader.i16(), Ok(i16::MIN));
        assert_eq!(reader.i32(), Ok(256));
        assert_eq!(reader.i64(), Ok(42));
        assert!(reader.is_empty());
    }

    #[test]
    fn u16_is_not_sign_extended() {
        let data = [0xff, 0xff];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u16(), Ok(65535));
    }

    #[test]
    fn reads_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_be_bytes());
        data.extend_from_slice(&std::f64::consts::PI.to_be_bytes());
        let mut reader = Reader::new(&data);
        assert_eq!(reader.f32(), Ok(1.5));
        assert_eq!(reader.f64(), Ok(std::f64::consts::PI));
    }

    #[test]
    fn short_read_reports_need_and_keeps_cursor() {
        let data = [0u8; 7];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.i64(),
            Err(BufferError::EndOfBuffer {
                needed: 8,
                remaining: 7
            })
        );
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0x55u8];
        let reader = Reader::new(&data);
        assert_eq!(reader.peek(), Ok(0x55));
        assert_eq!(reader.x, 0);

        let empty: [u8; 0] = [];
        assert!(Reader::new(&empty).peek().is_err());
    }

    #[test]
    fn buf_advances_cursor() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.buf(3), Ok([1u8, 2, 3].as_ref()));
        assert_eq!(reader.x, 3);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn utf8_checks_bounds_before_validity() {
        let data = [0xffu8, 0xfe];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.utf8(4),
            Err(BufferError::EndOfBuffer { .. })
        ));
        assert_eq!(reader.utf8(2), Err(BufferError::InvalidUtf8));
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn utf8_multibyte() {
        let data = "héllo".as_bytes();
        let mut reader = Reader::new(data);
        assert_eq!(reader.utf8(data.len()), Ok("héllo"));
    }
}
