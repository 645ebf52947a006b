//! Definitions for the ROS2 `builtin_interfaces` package.
//!
//! Based on definitions taken from <https://github.com/ros2/rcl_interfaces/tree/rolling/builtin_interfaces/msg>

use re_cdr::{CdrCursor, CdrError};
use serde::{Deserialize, Serialize};

use crate::CdrDecode;

/// Represents a specific point in ROS Time.
///
/// Messages of this datatype follow the ROS Time design:
/// <https://design.ros2.org/articles/clock_and_time.html>
///
/// # Examples
/// - The time `-1.7` seconds is represented as `{ sec: -2, nanosec: 300_000_000 }`
/// - The time `1.7` seconds is represented as `{ sec: 1,  nanosec: 700_000_000 }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    /// The seconds component, valid over all `int32` values.
    pub sec: i32,

    /// The nanoseconds component, valid in the range `[0, 1_000_000_000)`.
    /// This is added to the seconds component.
    pub nanosec: u32,
}

impl CdrDecode for Time {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            sec: cursor.read_i32()?,
            nanosec: cursor.read_u32()?,
        })
    }
}

/// A span of ROS Time, with the same representation as [`Time`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub sec: i32,
    pub nanosec: u32,
}

impl CdrDecode for Duration {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            sec: cursor.read_i32()?,
            nanosec: cursor.read_u32()?,
        })
    }
}
