use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{CdrError, ENCAPSULATION_HEADER_LEN, Endianness, RepresentationIdentifier};

/// Position-tracking reader over a CDR body.
///
/// All multi-byte reads align the offset to the natural width of the primitive first
/// (capped at [`RepresentationIdentifier::max_alignment`]). Alignment is relative to the
/// start of the body, i.e. the encapsulation header does not count.
#[derive(Debug, Clone)]
pub struct CdrCursor<'a> {
    body: &'a [u8],
    offset: usize,
    endianness: Endianness,
    max_alignment: usize,

    /// XCDR2: sequences of structs carry a DHEADER.
    delimited: bool,
}

macro_rules! impl_read_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $read:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Result<$ty, CdrError> {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            self.align(WIDTH)?;
            let bytes = self.take(WIDTH)?;
            Ok(match self.endianness {
                Endianness::Big => BigEndian::$read(bytes),
                Endianness::Little => LittleEndian::$read(bytes),
            })
        }
    };
}

impl<'a> CdrCursor<'a> {
    /// Parses the encapsulation header of a full payload and positions the cursor on the body.
    pub fn new(payload: &'a [u8]) -> Result<Self, CdrError> {
        let representation = RepresentationIdentifier::from_payload(payload)?;
        Ok(Self {
            body: &payload[ENCAPSULATION_HEADER_LEN..],
            offset: 0,
            endianness: representation.endianness(),
            max_alignment: representation.max_alignment(),
            delimited: representation.is_xcdr2(),
        })
    }

    /// A cursor over a bare body (no encapsulation header), using classic CDR alignment.
    pub fn with_body(body: &'a [u8], endianness: Endianness) -> Self {
        Self {
            body,
            offset: 0,
            endianness,
            max_alignment: 8,
            delimited: false,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Current offset, relative to the start of the body.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.body.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Advances the offset to the next multiple of `alignment`.
    ///
    /// `alignment` must be a power of two.
    pub fn align(&mut self, alignment: usize) -> Result<(), CdrError> {
        debug_assert!(alignment.is_power_of_two(), "bad alignment: {alignment}");

        let alignment = alignment.min(self.max_alignment);
        let padding = (alignment - self.offset % alignment) % alignment;
        self.take(padding).map(|_| ())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CdrError> {
        let available = self.remaining();
        if len > available {
            return Err(CdrError::OutOfBounds {
                offset: self.offset,
                needed: len,
                available,
            });
        }

        let bytes = &self.body[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, CdrError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, CdrError> {
        self.read_u8().map(u8::cast_signed)
    }

    /// Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool, CdrError> {
        self.read_u8().map(|v| v != 0)
    }

    impl_read_primitive!(read_u16, u16, read_u16);
    impl_read_primitive!(read_u32, u32, read_u32);
    impl_read_primitive!(read_u64, u64, read_u64);
    impl_read_primitive!(read_i16, i16, read_i16);
    impl_read_primitive!(read_i32, i32, read_i32);
    impl_read_primitive!(read_i64, i64, read_i64);
    impl_read_primitive!(read_f32, f32, read_f32);
    impl_read_primitive!(read_f64, f64, read_f64);

    /// Reads a `u32` length prefix followed by that many bytes of text.
    ///
    /// The length counts the trailing NUL, which is consumed but not returned.
    /// A zero length (no terminator at all) is read as the empty string.
    pub fn read_string(&mut self) -> Result<String, CdrError> {
        let len = self.read_u32()? as usize;
        let start = self.offset;
        let bytes = self.take(len)?;

        let text = match bytes.split_last() {
            Some((0, text)) => text,
            _ => bytes,
        };

        std::str::from_utf8(text)
            .map(str::to_owned)
            .map_err(|source| CdrError::InvalidUtf8 {
                offset: start,
                source,
            })
    }

    /// Reads a fixed-size array, which carries no length prefix on the wire.
    pub fn read_array<T: Copy + Default, const N: usize>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, CdrError>,
    ) -> Result<[T; N], CdrError> {
        let mut out = [T::default(); N];
        for slot in &mut out {
            *slot = read(self)?;
        }
        Ok(out)
    }

    /// Reads `count` repetitions of a sub-structure using `read` for each element.
    pub fn read_struct<T>(
        &mut self,
        count: usize,
        mut read: impl FnMut(&mut Self) -> Result<T, CdrError>,
    ) -> Result<Vec<T>, CdrError> {
        // Every element takes at least one byte, so don't trust `count` for the allocation.
        let mut out = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Reads a `u32` element count, then that many elements.
    pub fn read_sequence<T>(
        &mut self,
        read: impl FnMut(&mut Self) -> Result<T, CdrError>,
    ) -> Result<Vec<T>, CdrError> {
        let count = self.read_u32()? as usize;

        let available = self.remaining();
        if count > available {
            return Err(CdrError::OutOfBounds {
                offset: self.offset,
                needed: count,
                available,
            });
        }

        self.read_struct(count, read)
    }

    /// Like [`Self::read_sequence`], for elements that are structs rather than primitives.
    ///
    /// In XCDR2 such a sequence is preceded by a `u32` DHEADER giving its size in bytes.
    /// Bytes past the last element but within that size are skipped.
    pub fn read_struct_sequence<T>(
        &mut self,
        read: impl FnMut(&mut Self) -> Result<T, CdrError>,
    ) -> Result<Vec<T>, CdrError> {
        if !self.delimited {
            return self.read_sequence(read);
        }

        let declared = self.read_u32()? as usize;
        let start = self.offset;
        let available = self.remaining();
        if declared > available {
            return Err(CdrError::OutOfBounds {
                offset: start,
                needed: declared,
                available,
            });
        }

        let out = self.read_sequence(read)?;

        let consumed = self.offset - start;
        if consumed > declared {
            return Err(CdrError::InvalidDelimiter {
                offset: start,
                declared,
                consumed,
            });
        }
        self.offset = start + declared;

        Ok(out)
    }
}
