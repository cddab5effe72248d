//! A byte buffer that can be written exactly once, during construction, and
//! is immutable for the rest of its life.
//!
//! The operation set is partitioned in two: everything that can change
//! buffer content lives on [`Builder`], everything that observes it lives on
//! [`FrozenBuf`]. The only bridge between them is the consuming
//! [`Builder::freeze`], so sealing is enforced by ownership rather than by a
//! runtime flag — once a [`FrozenBuf`] exists, no value capable of writing
//! to its storage exists anywhere.
//!
//! ```
//! use frozenbuf::FrozenBuf;
//!
//! let buf = FrozenBuf::new(10, |b| {
//!     b.write_str("hello");
//!     b.write_u16_be(8, 0xCAFE).unwrap();
//! })
//! .unwrap();
//!
//! assert_eq!(&buf[..5], b"hello");
//! assert_eq!(buf.read_u16_be(8), Ok(0xCAFE));
//! ```
//!
//! The two-phase form is available directly when the closure style does not
//! fit:
//!
//! ```
//! use frozenbuf::Builder;
//!
//! let mut b = Builder::with_capacity(4)?;
//! b.write_u32_le(0, 42)?;
//! let buf = b.freeze();
//! assert_eq!(buf.read_u32_le(0), Ok(42));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]
#![warn(clippy::pedantic, clippy::nursery)]

mod buffer;
mod builder;
pub mod classify;
mod error;

#[cfg(feature = "serde")]
mod serde;

pub use buffer::FrozenBuf;
pub use builder::Builder;
pub use error::{BoundsError, ConstructionError};
