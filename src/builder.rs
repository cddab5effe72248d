use crate::error::{check_range, check_width, BoundsError, ConstructionError};
use crate::FrozenBuf;
use std::ops::Range;

macro_rules! impl_write {
    ($($(#[$doc:meta])* $name:ident, $ty:ty, $to_bytes:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self, offset: usize, value: $ty) -> Result<(), BoundsError> {
                self.set(offset, &value.$to_bytes())
            }
        )+
    };
}

/// A builder for a [`FrozenBuf`] that allows mutation before freezing it.
///
/// This is the only type in the crate that can change buffer contents. It is
/// consumed by [`Builder::freeze`], so once a buffer is sealed there is no
/// value left that could write to its storage.
///
/// No `Clone` or `Default` impls exist: a mutation capability can only be
/// obtained by allocating fresh storage.
pub struct Builder {
    buf: Vec<u8>,
}

impl Builder {
    /// Creates a builder backed by `size` zero-initialized bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Alloc`] if the allocator cannot provide
    /// the requested storage.
    pub fn with_capacity(size: usize) -> Result<Self, ConstructionError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|source| ConstructionError::Alloc { size, source })?;
        buf.resize(size, 0);
        Ok(Self { buf })
    }

    /// Converts the builder into a [`FrozenBuf`], making it immutable.
    ///
    /// This is a one-way transformation; there is no way back to a builder.
    ///
    /// ```compile_fail
    /// # use frozenbuf::Builder;
    /// let mut builder = Builder::with_capacity(4).unwrap();
    /// let frozen = builder.freeze();
    /// builder.fill(0xFF); // builder was consumed by `freeze`
    /// ```
    #[must_use]
    pub fn freeze(self) -> FrozenBuf {
        FrozenBuf::from_storage(self.buf.into_boxed_slice())
    }

    /// Writes the UTF-8 bytes of `s` at the start of the buffer, returning
    /// the number of bytes written.
    ///
    /// Truncates on a character boundary if `s` does not fit; no partial
    /// character is ever written.
    pub fn write_str(&mut self, s: &str) -> usize {
        self.write_str_at(0, s)
    }

    /// Writes the UTF-8 bytes of `s` at `offset`, returning the number of
    /// bytes written. Same truncation rule as [`Builder::write_str`].
    pub fn write_str_at(&mut self, offset: usize, s: &str) -> usize {
        let Some(available) = self.buf.len().checked_sub(offset) else {
            return 0;
        };
        let mut n = s.len().min(available);
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        self.buf[offset..offset + n].copy_from_slice(&s.as_bytes()[..n]);
        n
    }

    /// Copies `src` into the buffer at `offset`.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::OutOfBounds`] if `src` does not fit; nothing
    /// is written in that case.
    pub fn set(&mut self, offset: usize, src: &[u8]) -> Result<(), BoundsError> {
        check_range(offset, src.len(), self.buf.len())?;
        self.buf[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    impl_write! {
        /// Writes a `u8` at `offset`.
        write_u8, u8, to_le_bytes;
        /// Writes an `i8` at `offset`.
        write_i8, i8, to_le_bytes;
        /// Writes a little-endian `u16` at `offset`.
        write_u16_le, u16, to_le_bytes;
        /// Writes a big-endian `u16` at `offset`.
        write_u16_be, u16, to_be_bytes;
        /// Writes a little-endian `i16` at `offset`.
        write_i16_le, i16, to_le_bytes;
        /// Writes a big-endian `i16` at `offset`.
        write_i16_be, i16, to_be_bytes;
        /// Writes a little-endian `u32` at `offset`.
        write_u32_le, u32, to_le_bytes;
        /// Writes a big-endian `u32` at `offset`.
        write_u32_be, u32, to_be_bytes;
        /// Writes a little-endian `i32` at `offset`.
        write_i32_le, i32, to_le_bytes;
        /// Writes a big-endian `i32` at `offset`.
        write_i32_be, i32, to_be_bytes;
        /// Writes a little-endian `u64` at `offset`.
        write_u64_le, u64, to_le_bytes;
        /// Writes a big-endian `u64` at `offset`.
        write_u64_be, u64, to_be_bytes;
        /// Writes a little-endian `i64` at `offset`.
        write_i64_le, i64, to_le_bytes;
        /// Writes a big-endian `i64` at `offset`.
        write_i64_be, i64, to_be_bytes;
        /// Writes a little-endian `f32` at `offset`.
        write_f32_le, f32, to_le_bytes;
        /// Writes a big-endian `f32` at `offset`.
        write_f32_be, f32, to_be_bytes;
        /// Writes a little-endian `f64` at `offset`.
        write_f64_le, f64, to_le_bytes;
        /// Writes a big-endian `f64` at `offset`.
        write_f64_be, f64, to_be_bytes;
    }

    /// Writes the lowest `width` bytes of `value` at `offset`,
    /// little-endian.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and `value` must fit in that many bytes.
    pub fn write_uint_le(
        &mut self,
        offset: usize,
        value: u64,
        width: usize,
    ) -> Result<(), BoundsError> {
        check_width(width)?;
        check_uint_fits(value, width)?;
        self.set(offset, &value.to_le_bytes()[..width])
    }

    /// Writes the lowest `width` bytes of `value` at `offset`, big-endian.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and `value` must fit in that many bytes.
    pub fn write_uint_be(
        &mut self,
        offset: usize,
        value: u64,
        width: usize,
    ) -> Result<(), BoundsError> {
        check_width(width)?;
        check_uint_fits(value, width)?;
        self.set(offset, &value.to_be_bytes()[8 - width..])
    }

    /// Writes `value` as a `width`-byte two's-complement integer at
    /// `offset`, little-endian.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and `value` must be representable in that
    /// many bytes.
    pub fn write_int_le(
        &mut self,
        offset: usize,
        value: i64,
        width: usize,
    ) -> Result<(), BoundsError> {
        check_width(width)?;
        check_int_fits(value, width)?;
        self.set(offset, &value.to_le_bytes()[..width])
    }

    /// Writes `value` as a `width`-byte two's-complement integer at
    /// `offset`, big-endian.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and `value` must be representable in that
    /// many bytes.
    pub fn write_int_be(
        &mut self,
        offset: usize,
        value: i64,
        width: usize,
    ) -> Result<(), BoundsError> {
        check_width(width)?;
        check_int_fits(value, width)?;
        self.set(offset, &value.to_be_bytes()[8 - width..])
    }

    /// Sets every byte of the buffer to `value`.
    pub fn fill(&mut self, value: u8) {
        self.buf.fill(value);
    }

    /// Sets every byte in `range` to `value`.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::OutOfBounds`] if `range` exceeds the buffer.
    pub fn fill_range(&mut self, value: u8, range: Range<usize>) -> Result<(), BoundsError> {
        let len = range.end.saturating_sub(range.start);
        check_range(range.start, len, self.buf.len())?;
        self.buf[range.start..range.start + len].fill(value);
        Ok(())
    }

    /// Reverses the buffer in place.
    pub fn reverse(&mut self) {
        self.buf.reverse();
    }

    /// Sorts the bytes of the buffer in ascending order.
    pub fn sort(&mut self) {
        self.buf.sort_unstable();
    }

    /// Copies the bytes in `src` to `dest` within the same buffer. The
    /// ranges may overlap.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::OutOfBounds`] if either range exceeds the
    /// buffer.
    pub fn copy_within(&mut self, src: Range<usize>, dest: usize) -> Result<(), BoundsError> {
        let len = src.end.saturating_sub(src.start);
        check_range(src.start, len, self.buf.len())?;
        check_range(dest, len, self.buf.len())?;
        self.buf.copy_within(src.start..src.start + len, dest);
        Ok(())
    }

    /// Swaps the byte order of the buffer, treating it as a sequence of
    /// 16-bit elements.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::UnalignedLength`] if the length is not a
    /// multiple of 2.
    pub fn swap_16(&mut self) -> Result<(), BoundsError> {
        self.swap_width(2)
    }

    /// Swaps the byte order of the buffer, treating it as a sequence of
    /// 32-bit elements.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::UnalignedLength`] if the length is not a
    /// multiple of 4.
    pub fn swap_32(&mut self) -> Result<(), BoundsError> {
        self.swap_width(4)
    }

    /// Swaps the byte order of the buffer, treating it as a sequence of
    /// 64-bit elements.
    ///
    /// # Errors
    ///
    /// Fails with [`BoundsError::UnalignedLength`] if the length is not a
    /// multiple of 8.
    pub fn swap_64(&mut self) -> Result<(), BoundsError> {
        self.swap_width(8)
    }

    fn swap_width(&mut self, width: usize) -> Result<(), BoundsError> {
        if self.buf.len() % width != 0 {
            return Err(BoundsError::UnalignedLength {
                len: self.buf.len(),
                width,
            });
        }
        for chunk in self.buf.chunks_exact_mut(width) {
            chunk.reverse();
        }
        Ok(())
    }
}

fn check_uint_fits(value: u64, width: usize) -> Result<(), BoundsError> {
    if width < 8 && value >= 1 << (8 * width) {
        return Err(BoundsError::ValueTooLarge { width });
    }
    Ok(())
}

fn check_int_fits(value: i64, width: usize) -> Result<(), BoundsError> {
    if width < 8 {
        let max = (1i64 << (8 * width - 1)) - 1;
        let min = -(1i64 << (8 * width - 1));
        if value < min || value > max {
            return Err(BoundsError::ValueTooLarge { width });
        }
    }
    Ok(())
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("len", &self.buf.len())
            .finish()
    }
}

impl std::ops::Deref for Builder {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl std::ops::DerefMut for Builder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_starts_zeroed() {
        let b = Builder::with_capacity(16).unwrap();
        assert!(b.iter().all(|&byte| byte == 0));
        assert_eq!(b.len(), 16);
    }

    #[test]
    fn write_str_truncates_at_capacity() {
        let mut b = Builder::with_capacity(3).unwrap();
        assert_eq!(b.write_str("hello"), 3);
        assert_eq!(&b[..], b"hel");
    }

    #[test]
    fn write_str_never_splits_a_character() {
        // "héllo": 'é' is two bytes starting at index 1.
        let mut b = Builder::with_capacity(2).unwrap();
        assert_eq!(b.write_str("héllo"), 1);
        assert_eq!(&b[..], &[b'h', 0]);
    }

    #[test]
    fn write_str_at_past_end_writes_nothing() {
        let mut b = Builder::with_capacity(4).unwrap();
        assert_eq!(b.write_str_at(10, "hi"), 0);
    }

    #[test]
    fn set_rejects_overflow() {
        let mut b = Builder::with_capacity(4).unwrap();
        assert!(b.set(2, &[1, 2, 3]).is_err());
        assert_eq!(&b[..], &[0, 0, 0, 0]);
    }

    #[test]
    fn fixed_width_writes_land_where_asked() {
        let mut b = Builder::with_capacity(8).unwrap();
        b.write_u16_be(0, 0x1234).unwrap();
        b.write_u16_le(2, 0x1234).unwrap();
        b.write_u32_be(4, 0xDEAD_BEEF).unwrap();
        assert_eq!(&b[..], &[0x12, 0x34, 0x34, 0x12, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn variable_width_write_checks_fit() {
        let mut b = Builder::with_capacity(8).unwrap();
        b.write_uint_be(0, 0x0001_0203, 3).unwrap();
        assert_eq!(&b[..3], &[0x01, 0x02, 0x03]);
        assert_eq!(
            b.write_uint_le(0, 0x0100, 1),
            Err(BoundsError::ValueTooLarge { width: 1 })
        );
        assert_eq!(
            b.write_uint_le(0, 1, 0),
            Err(BoundsError::InvalidWidth { width: 0 })
        );
    }

    #[test]
    fn signed_variable_width_write() {
        let mut b = Builder::with_capacity(4).unwrap();
        b.write_int_be(0, -2, 2).unwrap();
        assert_eq!(&b[..2], &[0xFF, 0xFE]);
        assert_eq!(
            b.write_int_le(0, 128, 1),
            Err(BoundsError::ValueTooLarge { width: 1 })
        );
        b.write_int_le(0, -128, 1).unwrap();
        assert_eq!(b[0], 0x80);
    }

    #[test]
    fn fill_range_and_copy_within() {
        let mut b = Builder::with_capacity(6).unwrap();
        b.fill_range(0xAA, 0..3).unwrap();
        b.copy_within(0..3, 3).unwrap();
        assert_eq!(&b[..], &[0xAA; 6]);
        assert!(b.copy_within(4..8, 0).is_err());
    }

    #[test]
    fn swap_requires_aligned_length() {
        let mut b = Builder::with_capacity(4).unwrap();
        b.set(0, &[1, 2, 3, 4]).unwrap();
        b.swap_16().unwrap();
        assert_eq!(&b[..], &[2, 1, 4, 3]);
        b.swap_32().unwrap();
        assert_eq!(&b[..], &[3, 4, 1, 2]);
        assert_eq!(
            b.swap_64(),
            Err(BoundsError::UnalignedLength { len: 4, width: 8 })
        );
    }

    #[test]
    fn sort_and_reverse() {
        let mut b = Builder::with_capacity(4).unwrap();
        b.set(0, &[3, 1, 4, 1]).unwrap();
        b.sort();
        assert_eq!(&b[..], &[1, 1, 3, 4]);
        b.reverse();
        assert_eq!(&b[..], &[4, 3, 1, 1]);
    }

    #[test]
    fn indexed_mutation_is_legal_before_freezing() {
        let mut b = Builder::with_capacity(2).unwrap();
        b[0] = 0xFF;
        assert_eq!(b.freeze()[0], 0xFF);
    }
}
