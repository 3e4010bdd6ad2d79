//! UUID compatible, lexicographically sortable identifiers with a ULID-style layout
//!
//! ```rust
//! let id = uulid::new()?;
//! println!("{}", id); // e.g. "0178a284-9eaf-b3e7-036d-5b1b9f3cd753"
//! println!("{:?}", id.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), uulid::Error>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |          entropy_hi           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          entropy_lo                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          entropy_lo                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds, which
//!   covers dates up to the year 10889.
//! - The 16-bit `entropy_hi` and the 64-bit `entropy_lo` fields form an 80-bit entropy value that
//!   is randomly initialized whenever `unix_ts_ms` changes and incremented by one for each new ID
//!   generated within the same millisecond.
//!
//! Unlike UUIDv7, no version or variant bits are reserved, so every bit after the timestamp is
//! entropy. In the very rare circumstances where the 80-bit entropy cannot be incremented any
//! further within the same millisecond, the generator returns [`Error::EntropyExhausted`]. If the
//! system clock moves back, the generator returns [`Error::ClockWentBackward`] instead of breaking
//! the monotonic order of generated identifiers.
//!
//! # Encodings
//!
//! [`Uulid::parse`] accepts the 16-byte binary form, the 32-digit hex form and the 8-4-4-4-12
//! dashed hex form. The dashed form is used for [`Display`](std::fmt::Display), JSON and the
//! storage value returned by [`Uulid::value`].
//!
//! ```rust
//! use uulid::Uulid;
//!
//! let id: Uulid = "0178a284-9eaf-b3e7-036d-5b1b9f3cd753".parse()?;
//! assert_eq!(id.timestamp(), 1_617_634_303_663);
//! assert_eq!(id.entropy(), [0xb3, 0xe7, 0x03, 0x6d, 0x5b, 0x1b, 0x9f, 0x3c, 0xd7, 0x53]);
//! assert_eq!(Uulid::parse(id.as_bytes())?, id);
//! # Ok::<(), uulid::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default generator behind [`new()`].
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization via serde.
//! - `uuid`: enables conversion from/to the `uuid` crate's `Uuid` type.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Uulid, BINARY_SIZE, ENTROPY_SIZE, HEX_SIZE, TEXT_SIZE};

mod time;
pub use time::{max_time, time, timestamp, MAX_TIMESTAMP};

pub mod generator;
#[doc(inline)]
pub use generator::{Generator, StdSystemTime, TimeSource};

mod storage;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{default_generator, new};
