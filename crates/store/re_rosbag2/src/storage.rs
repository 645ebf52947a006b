//! Reading the `topics` and `messages` tables of a ROS 2 sqlite3 bag.
//!
//! All columns are read by name, never by position, so extra or reordered
//! columns in newer bag versions don't matter.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::{ChannelKind, ContainerError};

/// Identifies a topic: the `id` column of the `topics` table, referenced by `messages.topic_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(pub i64);

impl From<i64> for ChannelId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One row of the `topics` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDescriptor {
    pub id: ChannelId,

    /// Topic name, e.g. `/imu/data`.
    pub name: String,

    /// ROS 2 type name, e.g. `sensor_msgs/msg/Imu`.
    pub type_name: String,

    /// Almost always `cdr`.
    pub serialization_format: String,
}

impl ChannelDescriptor {
    /// The kind this channel decodes as, if its type is one we support.
    pub fn kind(&self) -> Option<ChannelKind> {
        let is_cdr = self.serialization_format.is_empty()
            || self.serialization_format.eq_ignore_ascii_case("cdr");
        if is_cdr {
            ChannelKind::from_type_name(&self.type_name)
        } else {
            None
        }
    }
}

/// All channels of a bag, by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTable(BTreeMap<ChannelId, ChannelDescriptor>);

impl ChannelTable {
    pub fn get(&self, id: ChannelId) -> Option<&ChannelDescriptor> {
        self.0.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ChannelDescriptor> for ChannelTable {
    fn from_iter<T: IntoIterator<Item = ChannelDescriptor>>(iter: T) -> Self {
        Self(iter.into_iter().map(|desc| (desc.id, desc)).collect())
    }
}

/// One row of the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Receive time, in nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub channel_id: ChannelId,

    /// CDR payload, encapsulation header included.
    pub payload: Vec<u8>,
}

/// Read-only access to a `.db3` bag.
pub struct BagReader {
    conn: Connection,
}

impl BagReader {
    const TOPICS_QUERY: &str = "SELECT id, name, type, serialization_format FROM topics";
    const MESSAGES_QUERY: &str = "SELECT topic_id, timestamp, data FROM messages ORDER BY id";
    const COUNT_QUERY: &str = "SELECT COUNT(*) FROM messages";
    const COUNTS_QUERY: &str = "SELECT topic_id, COUNT(*) AS count FROM messages GROUP BY topic_id";

    pub fn open(path: &Path) -> Result<Self, ContainerError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| ContainerError::Open {
            path: path.to_owned(),
            source,
        })?;

        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn channels(&self) -> Result<ChannelTable, ContainerError> {
        let query_err = |source| ContainerError::Query {
            table: "topics",
            source,
        };

        let mut stmt = self.conn.prepare(Self::TOPICS_QUERY).map_err(query_err)?;
        stmt.query_map([], |row| {
            Ok(ChannelDescriptor {
                id: ChannelId(row.get("id")?),
                name: row.get("name")?,
                type_name: row.get("type")?,
                serialization_format: row.get("serialization_format")?,
            })
        })
        .map_err(query_err)?
        .collect::<Result<ChannelTable, _>>()
        .map_err(query_err)
    }

    /// All messages, in insertion order.
    pub fn rows(&self) -> Result<Vec<Row>, ContainerError> {
        let query_err = |source| ContainerError::Query {
            table: "messages",
            source,
        };

        let mut stmt = self.conn.prepare(Self::MESSAGES_QUERY).map_err(query_err)?;
        stmt.query_map([], |row| {
            Ok(Row {
                timestamp: row.get("timestamp")?,
                channel_id: ChannelId(row.get("topic_id")?),
                payload: row.get("data")?,
            })
        })
        .map_err(query_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_err)
    }

    pub fn message_count(&self) -> Result<u64, ContainerError> {
        self.conn
            .query_row(Self::COUNT_QUERY, [], |row| row.get::<_, i64>(0))
            .map(|count| u64::try_from(count).unwrap_or_default())
            .map_err(|source| ContainerError::Query {
                table: "messages",
                source,
            })
    }

    /// Number of messages recorded on each channel.
    pub fn message_counts(&self) -> Result<BTreeMap<ChannelId, u64>, ContainerError> {
        let query_err = |source| ContainerError::Query {
            table: "messages",
            source,
        };

        let mut stmt = self.conn.prepare(Self::COUNTS_QUERY).map_err(query_err)?;
        stmt.query_map([], |row| {
            let count: i64 = row.get("count")?;
            Ok((
                ChannelId(row.get("topic_id")?),
                u64::try_from(count).unwrap_or_default(),
            ))
        })
        .map_err(query_err)?
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map_err(query_err)
    }
}
