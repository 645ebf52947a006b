//! Definitions for the ROS2 `visualization_msgs` package.
//!
//! Based on definitions taken from <https://github.com/ros2/common_interfaces/tree/rolling/visualization_msgs>

use re_cdr::{CdrCursor, CdrError};
use serde::{Deserialize, Serialize};

use crate::{
    CdrDecode, RosMessage, builtin_interfaces::Duration, geometry_msgs::Point,
    std_msgs::ColorRGBA, std_msgs::Header,
};

/// A 2D marker drawn over an image.
///
/// The on-vehicle inference node publishes its detections with this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMarker {
    pub header: Header,

    /// Namespace which is used with the id to form a unique id.
    pub ns: String,

    /// Unique id within the namespace.
    pub id: i32,

    /// One of `CIRCLE` (0), `LINE_STRIP` (1), `LINE_LIST` (2), `POLYGON` (3) or `POINTS` (4).
    #[serde(rename = "type")]
    pub marker_type: i32,

    /// `ADD` (0) or `REMOVE` (1).
    pub action: i32,

    /// 2D, in pixel-coords.
    pub position: Point,

    /// The diameter for a circle, etc.
    pub scale: f32,
    pub outline_color: ColorRGBA,

    /// Whether to fill in the shape with color.
    pub filled: u8,

    /// Color [0.0-1.0].
    pub fill_color: ColorRGBA,

    /// How long the object should last before being automatically deleted.
    /// 0 indicates forever.
    pub lifetime: Duration,

    /// Coordinates in 2D in pixel coords. Used for `LINE_STRIP`, `LINE_LIST`, `POINTS`, etc.
    pub points: Vec<Point>,

    /// The color for each line, point, etc. in the points field.
    pub outline_colors: Vec<ColorRGBA>,
}

impl ImageMarker {
    pub const CIRCLE: i32 = 0;
    pub const LINE_STRIP: i32 = 1;
    pub const LINE_LIST: i32 = 2;
    pub const POLYGON: i32 = 3;
    pub const POINTS: i32 = 4;

    pub const ADD: i32 = 0;
    pub const REMOVE: i32 = 1;
}

impl CdrDecode for ImageMarker {
    fn decode(cursor: &mut CdrCursor<'_>) -> Result<Self, CdrError> {
        Ok(Self {
            header: Header::decode(cursor)?,
            ns: cursor.read_string()?,
            id: cursor.read_i32()?,
            marker_type: cursor.read_i32()?,
            action: cursor.read_i32()?,
            position: Point::decode(cursor)?,
            scale: cursor.read_f32()?,
            outline_color: ColorRGBA::decode(cursor)?,
            filled: cursor.read_u8()?,
            fill_color: ColorRGBA::decode(cursor)?,
            lifetime: Duration::decode(cursor)?,
            points: cursor.read_struct_sequence(Point::decode)?,
            outline_colors: cursor.read_struct_sequence(ColorRGBA::decode)?,
        })
    }
}

impl RosMessage for ImageMarker {
    const TYPE_NAME: &'static str = "visualization_msgs/msg/ImageMarker";
}
