//! The 4-byte encapsulation header that precedes every serialized ROS 2 message.
//!
//! Layout: a big-endian `u16` representation identifier, followed by two option bytes
//! that ROS 2 leaves at zero and we ignore.
//!
//! See the DDS-XTypes specification, section 7.6.3.1.2.

use crate::CdrError;

/// Length of the encapsulation header, in bytes.
pub const ENCAPSULATION_HEADER_LEN: usize = 4;

/// Byte order of a CDR body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    Big,

    #[default]
    Little,
}

/// The representation identifiers we know how to read.
///
/// Parameter-list encodings (`PL_CDR*`) and delimited `D_CDR2*` are used for mutable
/// and appendable types, which never show up in the plain ROS 2 messages this crate
/// targets, so they are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationIdentifier {
    /// Classic (XCDR1) CDR, big endian.
    CdrBe,

    /// Classic (XCDR1) CDR, little endian. This is what ROS 2 writes in practice.
    CdrLe,

    /// XCDR2 plain CDR, big endian.
    Cdr2Be,

    /// XCDR2 plain CDR, little endian.
    Cdr2Le,
}

impl RepresentationIdentifier {
    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self, CdrError> {
        match u16::from_be_bytes(bytes) {
            0x0000 => Ok(Self::CdrBe),
            0x0001 => Ok(Self::CdrLe),
            0x0006 => Ok(Self::Cdr2Be),
            0x0007 => Ok(Self::Cdr2Le),
            other => Err(CdrError::UnsupportedEncapsulation(other)),
        }
    }

    /// Parses the identifier out of the first two bytes of a payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, CdrError> {
        match payload {
            [a, b, _, _, ..] => Self::from_bytes([*a, *b]),
            _ => Err(CdrError::ShortHeader(payload.len())),
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        let id: u16 = match self {
            Self::CdrBe => 0x0000,
            Self::CdrLe => 0x0001,
            Self::Cdr2Be => 0x0006,
            Self::Cdr2Le => 0x0007,
        };
        id.to_be_bytes()
    }

    /// The full 4-byte header for this identifier, with zeroed options.
    pub fn header(self) -> [u8; ENCAPSULATION_HEADER_LEN] {
        let [a, b] = self.to_bytes();
        [a, b, 0x00, 0x00]
    }

    pub fn endianness(self) -> Endianness {
        match self {
            Self::CdrBe | Self::Cdr2Be => Endianness::Big,
            Self::CdrLe | Self::Cdr2Le => Endianness::Little,
        }
    }

    /// XCDR2 changes alignment and delimits sequences of structs.
    pub fn is_xcdr2(self) -> bool {
        matches!(self, Self::Cdr2Be | Self::Cdr2Le)
    }

    /// Largest alignment any primitive is padded to.
    ///
    /// XCDR2 caps the alignment of 8-byte primitives at 4.
    pub fn max_alignment(self) -> usize {
        if self.is_xcdr2() { 4 } else { 8 }
    }
}
