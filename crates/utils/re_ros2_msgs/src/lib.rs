//! Definitions of the ROS 2 messages recorded in vehicle bags.
//!
//! Based on definitions taken from <https://github.com/ros2/common_interfaces/tree/rolling>
//! and <https://github.com/ros2/rcl_interfaces/tree/rolling/builtin_interfaces>.
//!
//! Each type implements [`CdrDecode`], a hand-written decoder that reads the fields in wire
//! order with a [`CdrCursor`]. The same types derive [`serde::Serialize`], which lets
//! [`encode_message`] write them back to CDR through `cdr-encoding`.

pub mod builtin_interfaces;
pub mod geometry_msgs;
pub mod sensor_msgs;
pub mod std_msgs;
pub mod visualization_msgs;

use re_cdr::{CdrCursor, CdrError, Endianness, RepresentationIdentifier};

/// A type that can be read from a CDR body, field by field.
pub trait CdrDecode: Sized {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError>;
}

/// A top-level message with a well-known ROS 2 type name.
pub trait RosMessage: CdrDecode + serde::Serialize {
    /// Fully-qualified type name, as it appears in the `topics` table of a bag,
    /// e.g. `sensor_msgs/msg/Imu`.
    const TYPE_NAME: &'static str;
}

/// Decodes a full payload: encapsulation header, then the body.
///
/// Trailing bytes after the last field are ignored; ROS 2 middlewares pad payloads
/// to a multiple of 4.
pub fn decode_message<T: CdrDecode>(payload: &[u8]) -> Result<T, CdrError> {
    let mut cursor = CdrCursor::new(payload)?;
    T::decode(&mut cursor)
}

#[derive(thiserror::Error, Debug)]
#[error("failed to encode CDR message: {0}")]
pub struct EncodeError(String);

/// Encodes a message into a full payload (classic CDR), including the encapsulation header.
pub fn encode_message<T: serde::Serialize>(
    message: &T,
    endianness: Endianness,
) -> Result<Vec<u8>, EncodeError> {
    let (representation, body) = match endianness {
        Endianness::Little => (
            RepresentationIdentifier::CdrLe,
            cdr_encoding::to_vec::<T, byteorder::LittleEndian>(message),
        ),
        Endianness::Big => (
            RepresentationIdentifier::CdrBe,
            cdr_encoding::to_vec::<T, byteorder::BigEndian>(message),
        ),
    };
    let body = body.map_err(|err| EncodeError(err.to_string()))?;

    let mut payload = representation.header().to_vec();
    payload.extend_from_slice(&body);
    Ok(payload)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::{CdrDecode, Endianness, decode_message, encode_message};

    /// Encodes `message`, decodes it with the hand-written decoder, and re-encodes the result.
    ///
    /// Checks that both encodings are byte-identical, and returns the decoded message.
    pub fn round_trip<T>(message: &T, endianness: Endianness) -> T
    where
        T: CdrDecode + serde::Serialize + std::fmt::Debug + PartialEq,
    {
        let payload = encode_message(message, endianness).unwrap();
        let decoded: T = decode_message(&payload).unwrap();
        similar_asserts::assert_eq!(&decoded, message);

        let reencoded = encode_message(&decoded, endianness).unwrap();
        assert_eq!(payload, reencoded);

        decoded
    }

    /// Every strict prefix of a valid payload must fail to decode as a truncation.
    pub fn assert_prefixes_fail<T: CdrDecode + std::fmt::Debug>(payload: &[u8]) {
        for len in 0..payload.len() {
            match decode_message::<T>(&payload[..len]) {
                Err(err) => assert!(err.is_truncation(), "prefix {len}: unexpected {err:?}"),
                Ok(msg) => panic!("prefix {len} decoded to {msg:?}"),
            }
        }
    }
}
