//! The closed set of message schemas we know how to decode.
//!
//! Each [`ChannelKind`] is tied to exactly one ROS 2 type name and one decode routine.
//! Dispatch is a plain `match`: there is no runtime schema introspection.

use re_cdr::CdrError;
use re_ros2_msgs::{
    RosMessage as _, decode_message,
    geometry_msgs::{Quaternion, Vector3},
    sensor_msgs::{Imu, NavSatFix},
    std_msgs::Float32,
    visualization_msgs::ImageMarker,
};
use serde::Serialize;

use crate::DecodeError;

/// The logical data channels of a vehicle bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// IMU readings (`sensor_msgs/msg/Imu`).
    Motion,

    /// Satellite fixes (`sensor_msgs/msg/NavSatFix`).
    Gps,

    /// Vehicle speed (`std_msgs/msg/Float32`).
    Speed,

    /// Detections from the inference node (`visualization_msgs/msg/ImageMarker`).
    Infer,
}

impl ChannelKind {
    /// All kinds, in output order.
    pub const ALL: [Self; 4] = [Self::Motion, Self::Gps, Self::Speed, Self::Infer];

    pub fn name(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::Gps => "gps",
            Self::Speed => "speed",
            Self::Infer => "infer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The ROS 2 type name recorded in the `topics` table for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Motion => Imu::TYPE_NAME,
            Self::Gps => NavSatFix::TYPE_NAME,
            Self::Speed => Float32::TYPE_NAME,
            Self::Infer => ImageMarker::TYPE_NAME,
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == type_name)
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The parts of an IMU reading we surface. Covariances are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motion {
    pub linear_acceleration: Vector3,
    pub angular_velocity: Vector3,
    pub orientation: Quaternion,
}

impl From<Imu> for Motion {
    fn from(imu: Imu) -> Self {
        Self {
            linear_acceleration: imu.linear_acceleration,
            angular_velocity: imu.angular_velocity,
            orientation: imu.orientation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gps {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<NavSatFix> for Gps {
    fn from(fix: NavSatFix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Speed {
    pub speed: f32,
}

impl From<Float32> for Speed {
    fn from(msg: Float32) -> Self {
        Self { speed: msg.data }
    }
}

/// One decoded row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedRecord {
    Motion(Motion),
    Gps(Gps),
    Speed(Speed),

    /// Passed through as decoded.
    Infer(ImageMarker),
}

impl DecodedRecord {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::Motion(_) => ChannelKind::Motion,
            Self::Gps(_) => ChannelKind::Gps,
            Self::Speed(_) => ChannelKind::Speed,
            Self::Infer(_) => ChannelKind::Infer,
        }
    }
}

/// Decodes a full CDR payload (encapsulation header included) as the given kind.
pub fn decode_payload(kind: ChannelKind, payload: &[u8]) -> Result<DecodedRecord, CdrError> {
    Ok(match kind {
        ChannelKind::Motion => DecodedRecord::Motion(decode_message::<Imu>(payload)?.into()),
        ChannelKind::Gps => DecodedRecord::Gps(decode_message::<NavSatFix>(payload)?.into()),
        ChannelKind::Speed => DecodedRecord::Speed(decode_message::<Float32>(payload)?.into()),
        ChannelKind::Infer => DecodedRecord::Infer(decode_message::<ImageMarker>(payload)?),
    })
}

/// Like [`decode_payload`], with the row context attached to any error.
pub fn decode_row(
    kind: ChannelKind,
    row_index: usize,
    payload: &[u8],
) -> Result<DecodedRecord, DecodeError> {
    decode_payload(kind, payload).map_err(|err| DecodeError::new(kind, row_index, err))
}
