//! Classification of buffer operations into mutators and readers.
//!
//! The public surface of this crate is split at design time: every operation
//! that can change buffer contents lives on [`Builder`](crate::Builder),
//! everything else on [`FrozenBuf`](crate::FrozenBuf). The split was decided
//! by the marker-prefix rule below, applied once to the full operation set;
//! [`classify`] is kept so tests can pin each type's method list to its side
//! of the partition and catch a method landing on the wrong type.
//!
//! Indexed element access is deliberately outside the rule: the classifier
//! never sees `buf[i]`. On the sealed type it is exposed only through
//! `Deref<Target = [u8]>`, which cannot mutate, so indexed assignment is a
//! compile error rather than a classified operation.

/// Which side of the partition an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// The operation can change buffer contents. Only reachable on a
    /// [`Builder`](crate::Builder), before the buffer is sealed.
    Mutator,
    /// The operation only observes buffer contents. Available on
    /// [`FrozenBuf`](crate::FrozenBuf) for its whole lifetime.
    Reader,
}

/// Name prefixes that mark an operation as a mutator.
///
/// `buffer` is a catch-all for accessors that would hand out the backing
/// storage itself; none survive on the sealed type, where shared `&[u8]`
/// access is read-only by construction.
pub const MUTATOR_MARKERS: &[&str] = &[
    "set",
    "write",
    "swap",
    "fill",
    "reverse",
    "copy_within",
    "sort",
    "buffer",
];

/// Classifies an operation by name.
///
/// Pure and total: a name matching no marker is simply a [`Class::Reader`].
#[must_use]
pub fn classify(name: &str) -> Class {
    if MUTATOR_MARKERS.iter().any(|m| name.starts_with(m)) {
        Class::Mutator
    } else {
        Class::Reader
    }
}

/// The enumerated mutating operations, as found on [`Builder`](crate::Builder).
pub const MUTATOR_OPS: &[&str] = &[
    "write_str",
    "write_str_at",
    "set",
    "write_u8",
    "write_i8",
    "write_u16_le",
    "write_u16_be",
    "write_i16_le",
    "write_i16_be",
    "write_u32_le",
    "write_u32_be",
    "write_i32_le",
    "write_i32_be",
    "write_u64_le",
    "write_u64_be",
    "write_i64_le",
    "write_i64_be",
    "write_f32_le",
    "write_f32_be",
    "write_f64_le",
    "write_f64_be",
    "write_uint_le",
    "write_uint_be",
    "write_int_le",
    "write_int_be",
    "fill",
    "fill_range",
    "reverse",
    "sort",
    "copy_within",
    "swap_16",
    "swap_32",
    "swap_64",
];

/// The enumerated read-only operations, as found on
/// [`FrozenBuf`](crate::FrozenBuf).
pub const READER_OPS: &[&str] = &[
    "len",
    "is_empty",
    "byte_len",
    "byte_offset",
    "bytes_per_element",
    "get",
    "read_u8",
    "read_i8",
    "read_u16_le",
    "read_u16_be",
    "read_i16_le",
    "read_i16_be",
    "read_u32_le",
    "read_u32_be",
    "read_i32_le",
    "read_i32_be",
    "read_u64_le",
    "read_u64_be",
    "read_i64_le",
    "read_i64_be",
    "read_f32_le",
    "read_f32_be",
    "read_f64_le",
    "read_f64_be",
    "read_uint_le",
    "read_uint_be",
    "read_int_le",
    "read_int_be",
    "index_of",
    "last_index_of",
    "iter",
    "slice",
    "to_vec",
    "copy_to",
    "as_utf8",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builder_op_is_a_mutator() {
        for op in MUTATOR_OPS {
            assert_eq!(classify(op), Class::Mutator, "{op} misclassified");
        }
    }

    #[test]
    fn every_sealed_op_is_a_reader() {
        for op in READER_OPS {
            assert_eq!(classify(op), Class::Reader, "{op} misclassified");
        }
    }

    #[test]
    fn surfaces_are_disjoint() {
        for op in MUTATOR_OPS {
            assert!(!READER_OPS.contains(op), "{op} appears on both surfaces");
        }
    }

    // `copy_to` copies *out of* the buffer into a caller slice; only
    // `copy_within` moves bytes inside the storage.
    #[test]
    fn copy_to_is_not_caught_by_the_copy_within_marker() {
        assert_eq!(classify("copy_to"), Class::Reader);
        assert_eq!(classify("copy_within"), Class::Mutator);
    }

    #[test]
    fn unknown_names_default_to_reader() {
        assert_eq!(classify("checksum"), Class::Reader);
        assert_eq!(classify(""), Class::Reader);
    }
}
