//! Reading CDR-encoded ROS 2 payloads.
//!
//! A serialized ROS 2 message is a 4-byte encapsulation header followed by a CDR body.
//! The header names the byte order (and the CDR flavor); the body lays out each field
//! in declaration order, with every primitive aligned to its natural width relative to
//! the first body byte.
//!
//! [`CdrCursor`] walks such a body field by field. It never allocates except for
//! strings and sequences, and every read is bounds-checked: a short payload is an
//! [`CdrError::OutOfBounds`], never a panic.
//!
//! ```
//! # use re_cdr::CdrCursor;
//! // CDR_LE header, then `float32 data = 12.75`.
//! let payload = [0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x4c, 0x41];
//! let mut cursor = CdrCursor::new(&payload)?;
//! assert_eq!(cursor.read_f32()?, 12.75);
//! # Ok::<(), re_cdr::CdrError>(())
//! ```

mod cursor;
mod encapsulation;
mod error;

pub use self::cursor::CdrCursor;
pub use self::encapsulation::{ENCAPSULATION_HEADER_LEN, Endianness, RepresentationIdentifier};
pub use self::error::CdrError;
