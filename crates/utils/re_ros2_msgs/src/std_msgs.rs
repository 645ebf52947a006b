//! Definitions for the ROS2 `std_msgs` package.
//!
//! Based on definitions taken from <https://github.com/ros2/common_interfaces/tree/rolling/std_msgs>

use re_cdr::{CdrCursor, CdrError};
use serde::{Deserialize, Serialize};

use crate::{CdrDecode, RosMessage, builtin_interfaces::Time};

/// Standard metadata for higher-level stamped data types.
///
/// This is generally used to communicate timestamped data
/// in a particular coordinate frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Two-integer timestamp that is expressed as seconds and nanoseconds.
    pub stamp: Time,

    /// Transform frame with which this data is associated.
    pub frame_id: String,
}

impl CdrDecode for Header {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            stamp: Time::decode(cursor)?,
            frame_id: cursor.read_string()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl CdrDecode for ColorRGBA {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            r: cursor.read_f32()?,
            g: cursor.read_f32()?,
            b: cursor.read_f32()?,
            a: cursor.read_f32()?,
        })
    }
}

/// A single `float32` value.
///
/// Vehicles publish their speed with this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Float32 {
    pub data: f32,
}

impl CdrDecode for Float32 {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            data: cursor.read_f32()?,
        })
    }
}

impl RosMessage for Float32 {
    const TYPE_NAME: &'static str = "std_msgs/msg/Float32";
}
