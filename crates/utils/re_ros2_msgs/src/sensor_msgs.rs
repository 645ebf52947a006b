//! Definitions for the ROS2 `sensor_msgs` package.
//!
//! Based on definitions taken from <https://github.com/ros2/common_interfaces/tree/rolling/sensor_msgs>

use re_cdr::{CdrCursor, CdrError};
use serde::{Deserialize, Serialize};

use crate::{
    CdrDecode, RosMessage,
    geometry_msgs::{Quaternion, Vector3},
    std_msgs::Header,
};

/// This is a message to hold data from an IMU (Inertial Measurement Unit)
///
/// Accelerations should be in m/s^2 (not in g's), and rotational velocity should be in rad/sec
///
/// If the covariance of the measurement is known, it should be filled in (if all you know is the
/// variance of each measurement, e.g. from the datasheet, just put those along the diagonal)
/// A covariance matrix of all zeros will be interpreted as "covariance unknown", and to use the
/// data a covariance will have to be assumed or gotten from some other source
///
/// If you have no estimate for one of the data elements (e.g. your IMU doesn't produce an
/// orientation estimate), please set element 0 of the associated covariance matrix to -1
/// If you are interpreting this message, please check for a value of -1 in the first element of each
/// covariance matrix, and disregard the associated estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Imu {
    /// Metadata including timestamp and coordinate frame.
    pub header: Header,

    pub orientation: Quaternion,
    pub orientation_covariance: [f64; 9],

    pub angular_velocity: Vector3,
    pub angular_velocity_covariance: [f64; 9],

    pub linear_acceleration: Vector3,
    pub linear_acceleration_covariance: [f64; 9],
}

impl CdrDecode for Imu {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            header: Header::decode(cursor)?,
            orientation: Quaternion::decode(cursor)?,
            orientation_covariance: cursor.read_array(CdrCursor::read_f64)?,
            angular_velocity: Vector3::decode(cursor)?,
            angular_velocity_covariance: cursor.read_array(CdrCursor::read_f64)?,
            linear_acceleration: Vector3::decode(cursor)?,
            linear_acceleration_covariance: cursor.read_array(CdrCursor::read_f64)?,
        })
    }
}

impl RosMessage for Imu {
    const TYPE_NAME: &'static str = "sensor_msgs/msg/Imu";
}

/// Navigation Satellite fix status for any Global Navigation Satellite System.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSatStatus {
    /// `STATUS_NO_FIX` (-1), `STATUS_FIX` (0), `STATUS_SBAS_FIX` (1) or `STATUS_GBAS_FIX` (2).
    pub status: i8,

    /// Bit mask of the satellite systems used: GPS (1), GLONASS (2), COMPASS (4), GALILEO (8).
    pub service: u16,
}

impl NavSatStatus {
    pub const STATUS_NO_FIX: i8 = -1;
    pub const STATUS_FIX: i8 = 0;
}

impl CdrDecode for NavSatStatus {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            status: cursor.read_i8()?,
            service: cursor.read_u16()?,
        })
    }
}

/// Navigation Satellite fix for any Global Navigation Satellite System
///
/// Specified using the WGS 84 reference ellipsoid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavSatFix {
    /// `header.stamp` specifies the ROS time for this measurement (the
    /// corresponding satellite time may be reported using the
    /// `sensor_msgs/TimeReference` message).
    pub header: Header,

    /// Satellite fix status information.
    pub status: NavSatStatus,

    /// Latitude in degrees. Positive is north of equator; negative is south.
    pub latitude: f64,

    /// Longitude in degrees. Positive is east of prime meridian; negative is west.
    pub longitude: f64,

    /// Altitude in meters. Positive is above the WGS 84 ellipsoid
    /// (quiet NaN if no altitude is available).
    pub altitude: f64,

    /// Position covariance (m^2) defined relative to a tangential plane
    /// through the reported position, in row-major order (East, North, Up).
    pub position_covariance: [f64; 9],

    /// `COVARIANCE_TYPE_UNKNOWN` (0) through `COVARIANCE_TYPE_KNOWN` (3).
    pub position_covariance_type: u8,
}

impl CdrDecode for NavSatFix {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            header: Header::decode(cursor)?,
            status: NavSatStatus::decode(cursor)?,
            latitude: cursor.read_f64()?,
            longitude: cursor.read_f64()?,
            altitude: cursor.read_f64()?,
            position_covariance: cursor.read_array(CdrCursor::read_f64)?,
            position_covariance_type: cursor.read_u8()?,
        })
    }
}

impl RosMessage for NavSatFix {
    const TYPE_NAME: &'static str = "sensor_msgs/msg/NavSatFix";
}
