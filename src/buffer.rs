use crate::error::{check_range, check_width, BoundsError, ConstructionError};
use crate::Builder;
use std::ops::{Bound, RangeBounds};

macro_rules! impl_read {
    ($($(#[$doc:meta])* $name:ident, $ty:ty, $from_bytes:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, offset: usize) -> Result<$ty, BoundsError> {
                const N: usize = std::mem::size_of::<$ty>();
                check_range(offset, N, self.data.len())?;
                let mut bytes = [0u8; N];
                bytes.copy_from_slice(&self.data[offset..offset + N]);
                Ok(<$ty>::$from_bytes(bytes))
            }
        )+
    };
}

/// An immutable byte buffer, sealed after a single initialization phase.
///
/// A `FrozenBuf` is created either by [`Builder::freeze`] or by handing
/// [`FrozenBuf::new`] an initializer closure. Either way, the mutation
/// capability is gone by the time the value exists: `freeze` consumes the
/// builder, and the closure only ever borrows it. Every operation on a
/// sealed buffer observes content without changing it.
///
/// The buffer dereferences to `&[u8]`, so the whole read-only slice API
/// (indexing, iteration, `contains`, pattern splitting, ...) is available
/// on top of the inherent methods.
///
/// Attempting to mutate a sealed buffer is a compile error:
///
/// ```compile_fail
/// let buf = frozenbuf::FrozenBuf::new(4, |_| {}).unwrap();
/// buf.fill(0xFF); // no `&mut self` access exists on a sealed buffer
/// ```
///
/// ```compile_fail
/// let buf = frozenbuf::FrozenBuf::new(4, |_| {}).unwrap();
/// buf[0] = 1; // indexed access is read-only
/// ```
///
/// Concurrent reads from multiple threads are safe because the storage is
/// immutable; the buffer is `Send + Sync` for that reason alone, it adds no
/// synchronization of its own.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrozenBuf {
    data: Box<[u8]>,
}

impl FrozenBuf {
    pub(crate) fn from_storage(data: Box<[u8]>) -> Self {
        Self { data }
    }

    /// Creates a sealed buffer of `size` zeroed bytes, running `init`
    /// exactly once to write its content.
    ///
    /// The [`Builder`] is lent to the closure for the duration of the call
    /// and cannot be smuggled out; once `new` returns, nothing that can
    /// write to the storage exists anymore.
    ///
    /// ```
    /// let buf = frozenbuf::FrozenBuf::new(10, |b| {
    ///     b.write_str("hello");
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(buf.read_u8(0), Ok(b'h'));
    /// assert_eq!(buf.len(), 10);
    /// ```
    ///
    /// Keeping the borrow past the closure does not compile:
    ///
    /// ```compile_fail
    /// let mut stash = None;
    /// let buf = frozenbuf::FrozenBuf::new(4, |b| stash = Some(b)).unwrap();
    /// stash.take().unwrap().fill(0xFF);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Alloc`] if the storage cannot be
    /// allocated; `init` is not invoked in that case.
    pub fn new<F>(size: usize, init: F) -> Result<Self, ConstructionError>
    where
        F: FnOnce(&mut Builder),
    {
        let mut builder = Builder::with_capacity(size)?;
        init(&mut builder);
        Ok(builder.freeze())
    }

    /// Like [`FrozenBuf::new`], but the initializer may fail.
    ///
    /// An error from `init` propagates unchanged and no buffer is produced;
    /// the partially written storage is simply dropped.
    ///
    /// # Errors
    ///
    /// Returns the initializer's error, or an allocation failure converted
    /// through `E: From<ConstructionError>`.
    pub fn try_new<E, F>(size: usize, init: F) -> Result<Self, E>
    where
        E: From<ConstructionError>,
        F: FnOnce(&mut Builder) -> Result<(), E>,
    {
        let mut builder = Builder::with_capacity(size)?;
        init(&mut builder)?;
        Ok(builder.freeze())
    }

    /// Number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the buffer in bytes. Equal to [`FrozenBuf::len`] because
    /// the element type is `u8`; kept for typed-array-style metadata parity.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Byte offset of the buffer within its storage. Always 0: the storage
    /// is exclusively owned and never a view into something larger.
    #[must_use]
    pub const fn byte_offset(&self) -> usize {
        0
    }

    /// Size of one element in bytes. Always 1.
    #[must_use]
    pub const fn bytes_per_element(&self) -> usize {
        1
    }

    /// Returns the byte at `index` by value, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    impl_read! {
        /// Reads a `u8` at `offset`.
        read_u8, u8, from_le_bytes;
        /// Reads an `i8` at `offset`.
        read_i8, i8, from_le_bytes;
        /// Reads a little-endian `u16` at `offset`.
        read_u16_le, u16, from_le_bytes;
        /// Reads a big-endian `u16` at `offset`.
        read_u16_be, u16, from_be_bytes;
        /// Reads a little-endian `i16` at `offset`.
        read_i16_le, i16, from_le_bytes;
        /// Reads a big-endian `i16` at `offset`.
        read_i16_be, i16, from_be_bytes;
        /// Reads a little-endian `u32` at `offset`.
        read_u32_le, u32, from_le_bytes;
        /// Reads a big-endian `u32` at `offset`.
        read_u32_be, u32, from_be_bytes;
        /// Reads a little-endian `i32` at `offset`.
        read_i32_le, i32, from_le_bytes;
        /// Reads a big-endian `i32` at `offset`.
        read_i32_be, i32, from_be_bytes;
        /// Reads a little-endian `u64` at `offset`.
        read_u64_le, u64, from_le_bytes;
        /// Reads a big-endian `u64` at `offset`.
        read_u64_be, u64, from_be_bytes;
        /// Reads a little-endian `i64` at `offset`.
        read_i64_le, i64, from_le_bytes;
        /// Reads a big-endian `i64` at `offset`.
        read_i64_be, i64, from_be_bytes;
        /// Reads a little-endian `f32` at `offset`.
        read_f32_le, f32, from_le_bytes;
        /// Reads a big-endian `f32` at `offset`.
        read_f32_be, f32, from_be_bytes;
        /// Reads a little-endian `f64` at `offset`.
        read_f64_le, f64, from_le_bytes;
        /// Reads a big-endian `f64` at `offset`.
        read_f64_be, f64, from_be_bytes;
    }

    /// Reads a `width`-byte little-endian unsigned integer at `offset`.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and the range must fit in the buffer.
    pub fn read_uint_le(&self, offset: usize, width: usize) -> Result<u64, BoundsError> {
        check_width(width)?;
        check_range(offset, width, self.data.len())?;
        let mut bytes = [0u8; 8];
        bytes[..width].copy_from_slice(&self.data[offset..offset + width]);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Reads a `width`-byte big-endian unsigned integer at `offset`.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and the range must fit in the buffer.
    pub fn read_uint_be(&self, offset: usize, width: usize) -> Result<u64, BoundsError> {
        check_width(width)?;
        check_range(offset, width, self.data.len())?;
        let mut bytes = [0u8; 8];
        bytes[8 - width..].copy_from_slice(&self.data[offset..offset + width]);
        Ok(u64::from_be_bytes(bytes))
    }

    /// Reads a `width`-byte little-endian two's-complement integer at
    /// `offset`, sign-extended to `i64`.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and the range must fit in the buffer.
    pub fn read_int_le(&self, offset: usize, width: usize) -> Result<i64, BoundsError> {
        Ok(sign_extend(self.read_uint_le(offset, width)?, width))
    }

    /// Reads a `width`-byte big-endian two's-complement integer at
    /// `offset`, sign-extended to `i64`.
    ///
    /// # Errors
    ///
    /// `width` must be in `1..=8` and the range must fit in the buffer.
    pub fn read_int_be(&self, offset: usize, width: usize) -> Result<i64, BoundsError> {
        Ok(sign_extend(self.read_uint_be(offset, width)?, width))
    }

    /// Returns the position of the first occurrence of `needle`, or `None`.
    ///
    /// An empty needle matches at position 0.
    #[must_use]
    pub fn index_of(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(0);
        }
        if needle.len() > self.data.len() {
            return None;
        }
        self.data.windows(needle.len()).position(|w| w == needle)
    }

    /// Returns the position of the last occurrence of `needle`, or `None`.
    ///
    /// An empty needle matches at the end of the buffer.
    #[must_use]
    pub fn last_index_of(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(self.data.len());
        }
        if needle.len() > self.data.len() {
            return None;
        }
        self.data.windows(needle.len()).rposition(|w| w == needle)
    }

    /// Iterates over the bytes of the buffer.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data.iter()
    }

    /// Copies the bytes in `range` into a fresh `Vec<u8>`.
    ///
    /// Out-of-range bounds are clamped to the buffer, so this never fails.
    /// The result owns its storage; mutating it cannot affect the buffer.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Vec<u8> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.data.len(),
        };
        let end = end.min(self.data.len());
        let start = start.min(end);
        self.data[start..end].to_vec()
    }

    /// Copies the whole buffer into a fresh `Vec<u8>`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Copies as many bytes as fit into `dst`, returning the number copied.
    pub fn copy_to(&self, dst: &mut [u8]) -> usize {
        let n = self.data.len().min(dst.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        n
    }

    /// Interprets the buffer as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the standard [`std::str::Utf8Error`] if the content is not
    /// valid UTF-8.
    pub fn as_utf8(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.data)
    }
}

fn sign_extend(raw: u64, width: usize) -> i64 {
    let shift = 64 - 8 * width as u32;
    ((raw << shift) as i64) >> shift
}

impl std::fmt::Debug for FrozenBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrozenBuf({:?})", &self.data)
    }
}

impl std::ops::Deref for FrozenBuf {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for FrozenBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl std::borrow::Borrow<[u8]> for FrozenBuf {
    fn borrow(&self) -> &[u8] {
        &self.data
    }
}

impl<'a> IntoIterator for &'a FrozenBuf {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Seals an already-initialized byte vector. The vector is moved, so no
/// alias that could mutate the storage survives.
impl From<Vec<u8>> for FrozenBuf {
    fn from(value: Vec<u8>) -> Self {
        Self {
            data: value.into_boxed_slice(),
        }
    }
}

/// Seals a copy of the slice.
impl From<&[u8]> for FrozenBuf {
    fn from(value: &[u8]) -> Self {
        Self { data: value.into() }
    }
}

impl<const N: usize> From<[u8; N]> for FrozenBuf {
    fn from(value: [u8; N]) -> Self {
        Self { data: value.into() }
    }
}

impl PartialEq<[u8]> for FrozenBuf {
    fn eq(&self, other: &[u8]) -> bool {
        &*self.data == other
    }
}

impl PartialEq<&[u8]> for FrozenBuf {
    fn eq(&self, other: &&[u8]) -> bool {
        &*self.data == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for FrozenBuf {
    fn eq(&self, other: &[u8; N]) -> bool {
        &*self.data == other.as_slice()
    }
}

impl PartialEq<Vec<u8>> for FrozenBuf {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &*self.data == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrozenBuf {
        FrozenBuf::new(8, |b| {
            b.set(0, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08])
                .unwrap();
        })
        .unwrap()
    }

    #[test]
    fn metadata_reflects_requested_size() {
        for size in [0, 1, 7, 64, 4096] {
            let buf = FrozenBuf::new(size, |_| {}).unwrap();
            assert_eq!(buf.len(), size);
            assert_eq!(buf.byte_len(), size);
            assert_eq!(buf.byte_offset(), 0);
            assert_eq!(buf.bytes_per_element(), 1);
            assert!(buf.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn get_copies_out_by_value() {
        let buf = sample();
        assert_eq!(buf.get(0), Some(0x01));
        assert_eq!(buf.get(7), Some(0x08));
        assert_eq!(buf.get(8), None);
    }

    #[test]
    fn fixed_width_reads_both_endiannesses() {
        let buf = sample();
        assert_eq!(buf.read_u16_be(0), Ok(0x0102));
        assert_eq!(buf.read_u16_le(0), Ok(0x0201));
        assert_eq!(buf.read_u32_be(2), Ok(0x0304_0506));
        assert_eq!(buf.read_u64_le(0), Ok(0x0807_0605_0403_0201));
        assert_eq!(
            buf.read_u32_le(6),
            Err(BoundsError::OutOfBounds {
                offset: 6,
                len: 4,
                size: 8
            })
        );
    }

    #[test]
    fn float_reads_round_trip() {
        let buf = FrozenBuf::new(12, |b| {
            b.write_f32_le(0, 1.5).unwrap();
            b.write_f64_be(4, -2.25).unwrap();
        })
        .unwrap();
        assert_eq!(buf.read_f32_le(0), Ok(1.5));
        assert_eq!(buf.read_f64_be(4), Ok(-2.25));
    }

    #[test]
    fn variable_width_reads() {
        let buf = sample();
        assert_eq!(buf.read_uint_be(0, 3), Ok(0x0001_0203));
        assert_eq!(buf.read_uint_le(0, 3), Ok(0x0003_0201));
        assert_eq!(
            buf.read_uint_le(0, 9),
            Err(BoundsError::InvalidWidth { width: 9 })
        );
    }

    #[test]
    fn signed_variable_width_reads_sign_extend() {
        let buf = FrozenBuf::new(4, |b| {
            b.set(0, &[0xFF, 0xFE, 0x00, 0x7F]).unwrap();
        })
        .unwrap();
        assert_eq!(buf.read_int_be(0, 2), Ok(-2));
        assert_eq!(buf.read_int_le(2, 2), Ok(0x7F00));
        assert_eq!(buf.read_int_le(0, 1), Ok(-1));
        assert_eq!(buf.read_int_be(0, 4), Ok(-0x0001_FF81));
    }

    #[test]
    fn search_forward_and_backward() {
        let buf = FrozenBuf::new(10, |b| {
            assert_eq!(b.write_str("abcabc"), 6);
        })
        .unwrap();
        assert_eq!(buf.index_of(b"bc"), Some(1));
        assert_eq!(buf.last_index_of(b"bc"), Some(4));
        assert_eq!(buf.index_of(b"zz"), None);
        assert_eq!(buf.index_of(b""), Some(0));
        assert_eq!(buf.last_index_of(b""), Some(10));
    }

    #[test]
    fn slice_clamps_and_copies() {
        let buf = sample();
        assert_eq!(buf.slice(2..4), vec![0x03, 0x04]);
        assert_eq!(buf.slice(6..100), vec![0x07, 0x08]);
        assert_eq!(buf.slice(..), buf.to_vec());
        assert!(buf.slice(5..2).is_empty());
    }

    #[test]
    fn copy_to_is_bounded_by_destination() {
        let buf = sample();
        let mut dst = [0u8; 3];
        assert_eq!(buf.copy_to(&mut dst), 3);
        assert_eq!(dst, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn utf8_conversion() {
        let buf = FrozenBuf::new(5, |b| {
            b.write_str("héllo");
        })
        .unwrap();
        assert_eq!(buf.as_utf8().unwrap().trim_end_matches('\0'), "héll");

        let bad = FrozenBuf::from(vec![0xFF, 0xFE]);
        assert!(bad.as_utf8().is_err());
    }

    #[test]
    fn comparisons_work_across_types() {
        let buf = FrozenBuf::from(&b"abc"[..]);
        assert_eq!(buf, *b"abc");
        assert_eq!(buf, b"abc".to_vec());
        assert_eq!(buf, &b"abc"[..]);
        assert!(buf < FrozenBuf::from(&b"abd"[..]));
    }

    #[test]
    fn deref_exposes_the_slice_api_read_only() {
        let buf = sample();
        assert!(buf.contains(&0x05));
        assert_eq!(buf[3], 0x04);
        assert_eq!(buf.iter().copied().max(), Some(0x08));
    }
}
