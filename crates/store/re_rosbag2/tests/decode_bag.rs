use std::path::{Path, PathBuf};

use re_cdr::Endianness;
use re_ros2_msgs::{
    RosMessage, encode_message,
    geometry_msgs::{Point, Quaternion, Vector3},
    sensor_msgs::{Imu, NavSatFix, NavSatStatus},
    std_msgs::Float32,
    visualization_msgs::ImageMarker,
};
use re_rosbag2::{
    BagReader, ChannelId, ChannelKind, ContainerError, DecodeError, DecodeOptions, DecodedBag,
    FailurePolicy, KindSelection, decode_bag,
};
use rusqlite::{Connection, params};
use serde_json::json;

/// The tables `ros2 bag record` creates for the sqlite3 storage plugin.
const BAG_SCHEMA: &str = "
    CREATE TABLE schema(schema_version INTEGER PRIMARY KEY, ros_distro TEXT NOT NULL);
    CREATE TABLE metadata(id INTEGER PRIMARY KEY, metadata_version INTEGER NOT NULL, metadata TEXT NOT NULL);
    CREATE TABLE topics(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        serialization_format TEXT NOT NULL,
        offered_qos_profiles TEXT NOT NULL
    );
    CREATE TABLE messages(
        id INTEGER PRIMARY KEY,
        topic_id INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        data BLOB NOT NULL
    );
    CREATE INDEX timestamp_idx ON messages (timestamp ASC);
    INSERT INTO schema VALUES (3, 'humble');
";

const IMU: i64 = 1;
const GPS: i64 = 2;
const SPEED: i64 = 3;
const MARKERS: i64 = 4;
const CAMERA: i64 = 5;

/// Writes a synthetic `.db3` into a temporary directory.
struct TestBag {
    conn: Connection,
    path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TestBag {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_bag_0.db3");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(BAG_SCHEMA).unwrap();

        let bag = Self {
            conn,
            path,
            _dir: dir,
        };
        bag.topic(IMU, "/imu/data", Imu::TYPE_NAME);
        bag.topic(GPS, "/gps/fix", NavSatFix::TYPE_NAME);
        bag.topic(SPEED, "/vehicle/speed", Float32::TYPE_NAME);
        bag.topic(MARKERS, "/infer/markers", ImageMarker::TYPE_NAME);
        bag.topic(CAMERA, "/camera/image_raw", "sensor_msgs/msg/Image");
        bag
    }

    fn topic(&self, id: i64, name: &str, type_name: &str) {
        self.conn
            .execute(
                "INSERT INTO topics (id, name, type, serialization_format, offered_qos_profiles) VALUES (?1, ?2, ?3, 'cdr', '')",
                params![id, name, type_name],
            )
            .unwrap();
    }

    fn raw(&self, topic_id: i64, timestamp: i64, data: &[u8]) -> &Self {
        self.conn
            .execute(
                "INSERT INTO messages (topic_id, timestamp, data) VALUES (?1, ?2, ?3)",
                params![topic_id, timestamp, data],
            )
            .unwrap();
        self
    }

    fn message(&self, topic_id: i64, timestamp: i64, msg: &impl serde::Serialize) -> &Self {
        self.raw(
            topic_id,
            timestamp,
            &encode_message(msg, Endianness::Little).unwrap(),
        )
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, kind: &str) -> DecodedBag {
        decode_bag(
            self.path(),
            KindSelection::parse(kind),
            &DecodeOptions::default(),
        )
        .unwrap()
    }
}

fn imu() -> Imu {
    Imu {
        orientation: Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.5,
            w: 0.75,
        },
        angular_velocity: Vector3 {
            x: 0.25,
            y: -0.5,
            z: 1.0,
        },
        linear_acceleration: Vector3 {
            x: 0.5,
            y: 0.25,
            z: 9.75,
        },
        ..Default::default()
    }
}

fn nav_sat_fix(latitude: f64, longitude: f64) -> NavSatFix {
    NavSatFix {
        status: NavSatStatus {
            status: 0,
            service: 1,
        },
        latitude,
        longitude,
        altitude: 10.0,
        ..Default::default()
    }
}

fn marker() -> ImageMarker {
    ImageMarker {
        ns: "car".to_owned(),
        id: 3,
        marker_type: ImageMarker::LINE_STRIP,
        points: vec![
            Point {
                x: 1.0,
                y: 2.0,
                z: 0.0,
            },
            Point {
                x: 3.0,
                y: 4.0,
                z: 0.0,
            },
        ],
        ..Default::default()
    }
}

fn to_json(bag: &DecodedBag) -> serde_json::Value {
    serde_json::to_value(bag).unwrap()
}

#[test]
fn gps_fix() {
    let bag = TestBag::new();
    bag.message(GPS, 1000, &nav_sat_fix(37.5, -122.3));

    similar_asserts::assert_eq!(
        to_json(&bag.decode("gps")),
        json!({ "gps": { "1000": { "latitude": 37.5, "longitude": -122.3 } } })
    );
}

#[test]
fn vehicle_speed() {
    let bag = TestBag::new();
    bag.message(SPEED, 500, &Float32 { data: 12.75 });

    similar_asserts::assert_eq!(
        to_json(&bag.decode("speed")),
        json!({ "speed": { "500": { "speed": 12.75 } } })
    );
}

#[test]
fn all_kinds() {
    let bag = TestBag::new();
    bag.message(MARKERS, 40, &marker())
        .message(GPS, 20, &nav_sat_fix(1.0, 2.0))
        .message(IMU, 10, &imu())
        .message(SPEED, 30, &Float32 { data: 3.5 });

    let decoded = bag.decode("all");
    assert_eq!(decoded.kinds().collect::<Vec<_>>(), ChannelKind::ALL.to_vec());
    for kind in ChannelKind::ALL {
        assert_eq!(decoded.get(kind).unwrap().len(), 1, "{kind}");
    }
    assert!(decoded.report.is_clean());

    let value = to_json(&decoded);
    assert_eq!(
        value["motion"]["10"],
        json!({
            "linear_acceleration": { "x": 0.5, "y": 0.25, "z": 9.75 },
            "angular_velocity": { "x": 0.25, "y": -0.5, "z": 1.0 },
            "orientation": { "x": 0.0, "y": 0.0, "z": 0.5, "w": 0.75 },
        })
    );
    assert_eq!(value["infer"]["40"]["ns"], "car");
    assert_eq!(value["infer"]["40"]["type"], ImageMarker::LINE_STRIP);
    assert_eq!(value["infer"]["40"]["points"][1]["y"], 4.0);
}

#[test]
fn all_kinds_are_listed_even_when_empty() {
    let bag = TestBag::new();
    bag.message(SPEED, 1, &Float32 { data: 1.0 });

    similar_asserts::assert_eq!(
        to_json(&bag.decode("all")),
        json!({
            "motion": {},
            "gps": {},
            "speed": { "1": { "speed": 1.0 } },
            "infer": {},
        })
    );
}

#[test]
fn misspelled_kind_decodes_everything() {
    let bag = TestBag::new();
    bag.message(GPS, 1, &nav_sat_fix(1.0, 2.0))
        .message(SPEED, 2, &Float32 { data: 1.0 });

    let decoded = bag.decode("sped");
    assert_eq!(decoded.kinds().collect::<Vec<_>>(), ChannelKind::ALL.to_vec());
    assert_eq!(decoded.num_records(), 2);
}

#[test]
fn unknown_and_unsupported_channels_contribute_nothing() {
    let bag = TestBag::new();
    bag.message(SPEED, 1, &Float32 { data: 1.0 })
        .raw(42, 2, &[0, 1, 0, 0, 0, 0, 0, 0])
        .raw(CAMERA, 3, &[0, 1, 0, 0])
        .raw(CAMERA, 4, &[0, 1, 0, 0]);

    let decoded = bag.decode("all");
    assert_eq!(decoded.num_records(), 1);
    assert_eq!(decoded.report.unknown_channel_rows, 1);
    assert_eq!(decoded.report.unsupported_rows, 2);
    assert_eq!(decoded.report.skipped_count(), 0);
}

#[test]
fn message_count_covers_every_row() {
    let bag = TestBag::new();
    bag.message(SPEED, 1, &Float32 { data: 1.0 })
        .message(GPS, 2, &nav_sat_fix(1.0, 2.0))
        .raw(42, 3, &[0, 1, 0, 0])
        .raw(CAMERA, 4, &[0, 1, 0, 0]);

    let reader = BagReader::open(bag.path()).unwrap();
    assert_eq!(reader.message_count().unwrap(), 4);

    let decoded = bag.decode("all");
    let accounted = decoded.num_records()
        + decoded.report.skipped_count()
        + decoded.report.unknown_channel_rows
        + decoded.report.unsupported_rows;
    assert_eq!(accounted, 4);
}

#[test]
fn timestamps_within_a_channel() {
    let bag = TestBag::new();
    bag.message(SPEED, 200, &Float32 { data: 1.0 })
        .message(SPEED, 100, &Float32 { data: 2.0 })
        .message(SPEED, 200, &Float32 { data: 3.0 });

    let decoded = bag.decode("speed");
    let speed = decoded.get(ChannelKind::Speed).unwrap();

    // Scan order, with the later duplicate replacing the earlier one in place.
    assert_eq!(speed.keys().copied().collect::<Vec<_>>(), vec![200, 100]);
    similar_asserts::assert_eq!(
        to_json(&decoded),
        json!({ "speed": { "200": { "speed": 3.0 }, "100": { "speed": 2.0 } } })
    );
    assert_eq!(decoded.report.overwritten, 1);
}

#[test]
fn bad_rows_are_skipped() {
    let bag = TestBag::new();
    let fix = encode_message(&nav_sat_fix(1.0, 2.0), Endianness::Little).unwrap();
    bag.message(GPS, 1, &nav_sat_fix(3.0, 4.0))
        .raw(GPS, 2, &fix[..fix.len() / 2])
        .raw(SPEED, 3, &[0, 9, 0, 0, 0, 0, 0, 0])
        .message(GPS, 4, &nav_sat_fix(5.0, 6.0));

    let decoded = bag.decode("all");
    let gps = decoded.get(ChannelKind::Gps).unwrap();
    assert_eq!(gps.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
    assert!(decoded.get(ChannelKind::Speed).unwrap().is_empty());

    let skipped = &decoded.report.skipped;
    assert_eq!(skipped.len(), 2);

    assert_eq!(skipped[0].row_index, 1);
    assert_eq!(skipped[0].timestamp, 2);
    assert_eq!(skipped[0].channel_id, ChannelId(GPS));
    assert!(matches!(
        skipped[0].error,
        DecodeError::TruncatedPayload {
            kind: ChannelKind::Gps,
            row_index: 1,
            ..
        }
    ));

    assert_eq!(skipped[1].row_index, 2);
    assert_eq!(skipped[1].kind, ChannelKind::Speed);
    assert!(matches!(skipped[1].error, DecodeError::Malformed { .. }));
}

#[test]
fn abort_stops_at_the_earliest_bad_row() {
    let bag = TestBag::new();
    bag.message(IMU, 1, &imu())
        .raw(SPEED, 2, &[0, 1, 0])
        .raw(GPS, 3, &[0, 1, 0, 0]);

    for parallel in [false, true] {
        let options = DecodeOptions::default()
            .with_parallel(parallel)
            .with_failure_policy(FailurePolicy::Abort);
        let err = decode_bag(bag.path(), KindSelection::All, &options).unwrap_err();

        let ContainerError::Decode(err) = err else {
            panic!("expected a decode error, got {err:?}");
        };
        assert_eq!(err.kind(), ChannelKind::Speed);
        assert_eq!(err.row_index(), 1);
    }
}

#[test]
fn parallel_matches_sequential() {
    let bag = TestBag::new();
    for i in 0..50 {
        let timestamp = 1_675_100_880_000_000_000 + i * 10_000_000;
        bag.message(IMU, timestamp, &imu());
        bag.message(GPS, timestamp + 1, &nav_sat_fix(37.0 + i as f64 * 1e-4, -122.0));
        bag.message(SPEED, timestamp + 2, &Float32 { data: i as f32 });
        if i % 7 == 0 {
            bag.message(MARKERS, timestamp + 3, &marker());
            bag.raw(SPEED, timestamp + 4, &[0, 1]);
        }
    }

    let sequential =
        decode_bag(bag.path(), KindSelection::All, &DecodeOptions::default()).unwrap();
    let parallel = decode_bag(
        bag.path(),
        KindSelection::All,
        &DecodeOptions::default().with_parallel(true),
    )
    .unwrap();

    assert_eq!(sequential.num_records(), 50 * 3 + 8);
    assert_eq!(sequential.report.skipped_count(), 8);
    similar_asserts::assert_eq!(sequential, parallel);
}

#[test]
fn missing_messages_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE topics(id INTEGER, name TEXT, type TEXT, serialization_format TEXT);")
        .unwrap();

    let err = decode_bag(&path, KindSelection::All, &DecodeOptions::default()).unwrap_err();
    assert!(
        matches!(err, ContainerError::Query { table: "messages", .. }),
        "{err:?}"
    );
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = decode_bag(
        &dir.path().join("missing.db3"),
        KindSelection::All,
        &DecodeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ContainerError::Open { .. }), "{err:?}");
}
