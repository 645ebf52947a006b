//! Splits the rows of a bag into one batch per requested [`ChannelKind`].

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::{ChannelId, ChannelKind, ChannelTable, Row};

/// Which channel kinds to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindSelection {
    One(ChannelKind),

    #[default]
    All,
}

impl KindSelection {
    /// Parses a kind name, or `all`.
    ///
    /// Anything unrecognized selects every kind.
    pub fn parse(s: &str) -> Self {
        if s == "all" {
            return Self::All;
        }

        match ChannelKind::from_name(s) {
            Some(kind) => Self::One(kind),
            None => {
                log::warn!(
                    "Unknown channel kind {s:?}, decoding all of {:?}",
                    ChannelKind::ALL.map(ChannelKind::name)
                );
                Self::All
            }
        }
    }

    pub fn contains(self, kind: ChannelKind) -> bool {
        match self {
            Self::One(selected) => selected == kind,
            Self::All => true,
        }
    }

    /// The selected kinds, in output order.
    pub fn kinds(self) -> impl Iterator<Item = ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl std::fmt::Display for KindSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One(kind) => kind.fmt(f),
            Self::All => f.write_str("all"),
        }
    }
}

/// A row that passed routing, still undecoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedRow<'a> {
    /// Position of the row in the container scan.
    pub row_index: usize,
    pub timestamp: i64,
    pub channel_id: ChannelId,
    pub payload: &'a [u8],
}

/// The output of [`route`].
#[derive(Debug, Default)]
pub struct RoutedRows<'a> {
    /// One entry per selected kind, in output order, even if empty.
    pub batches: IndexMap<ChannelKind, Vec<RoutedRow<'a>>>,

    /// Rows whose channel id isn't in the `topics` table.
    pub unknown_channel_rows: usize,

    /// Rows on channels whose type we can't decode.
    pub unsupported_rows: usize,
}

pub fn route<'a>(
    channels: &ChannelTable,
    rows: &'a [Row],
    selection: KindSelection,
) -> RoutedRows<'a> {
    let mut routed = RoutedRows {
        batches: selection.kinds().map(|kind| (kind, Vec::new())).collect(),
        ..Default::default()
    };
    let mut reported_unsupported = BTreeSet::new();

    for (row_index, row) in rows.iter().enumerate() {
        let Some(channel) = channels.get(row.channel_id) else {
            routed.unknown_channel_rows += 1;
            continue;
        };

        let Some(kind) = channel.kind() else {
            routed.unsupported_rows += 1;
            if reported_unsupported.insert(channel.id) {
                log::debug!(
                    "Skipping channel {:?} with unsupported type {:?} ({:?})",
                    channel.name,
                    channel.type_name,
                    channel.serialization_format,
                );
            }
            continue;
        };

        if let Some(batch) = routed.batches.get_mut(&kind) {
            batch.push(RoutedRow {
                row_index,
                timestamp: row.timestamp,
                channel_id: row.channel_id,
                payload: &row.payload,
            });
        }
    }

    routed
}
