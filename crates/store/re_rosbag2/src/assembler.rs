//! Collects decoded rows into timestamp-keyed maps, one per channel kind.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    ChannelId, ChannelKind, DecodeError, DecodedRecord, FailurePolicy, router::RoutedRow,
    schema::decode_row,
};

/// Decoded records of one kind, keyed by receive timestamp, in scan order.
pub type TimestampedRecords = IndexMap<i64, DecodedRecord>;

/// A row that was dropped because it failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row_index: usize,
    pub timestamp: i64,
    pub channel_id: ChannelId,
    pub kind: ChannelKind,
    pub error: DecodeError,
}

/// Everything that didn't end up in the output, and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Rows that failed to decode, in scan order.
    pub skipped: Vec<SkippedRow>,

    /// Rows referencing a channel id missing from the `topics` table.
    pub unknown_channel_rows: usize,

    /// Rows on channels of a type we don't decode.
    pub unsupported_rows: usize,

    /// Rows that replaced an earlier row with the same kind and timestamp.
    pub overwritten: usize,
}

impl DecodeReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True if every routed row made it into the output unchanged.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.overwritten == 0
    }

    pub fn merge(&mut self, other: Self) {
        let Self {
            skipped,
            unknown_channel_rows,
            unsupported_rows,
            overwritten,
        } = other;

        self.skipped.extend(skipped);
        self.unknown_channel_rows += unknown_channel_rows;
        self.unsupported_rows += unsupported_rows;
        self.overwritten += overwritten;
    }
}

/// Builds the records of a single kind.
#[derive(Debug)]
pub struct RecordAssembler {
    kind: ChannelKind,
    records: TimestampedRecords,
    report: DecodeReport,
}

impl RecordAssembler {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            records: TimestampedRecords::default(),
            report: DecodeReport::default(),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// A later record for an existing timestamp replaces the earlier one in place.
    pub fn insert(&mut self, timestamp: i64, record: DecodedRecord) {
        debug_assert_eq!(record.kind(), self.kind);

        if self.records.insert(timestamp, record).is_some() {
            log::debug!(
                "Overwriting {} record at duplicate timestamp {timestamp}",
                self.kind
            );
            self.report.overwritten += 1;
        }
    }

    pub fn skip(&mut self, row: &RoutedRow<'_>, error: DecodeError) {
        log::debug!("Skipping row {}: {error}", row.row_index);
        self.report.skipped.push(SkippedRow {
            row_index: row.row_index,
            timestamp: row.timestamp,
            channel_id: row.channel_id,
            kind: self.kind,
            error,
        });
    }

    pub fn finish(self) -> (TimestampedRecords, DecodeReport) {
        (self.records, self.report)
    }
}

/// Decodes and assembles all rows routed to `kind`.
pub fn assemble_kind(
    kind: ChannelKind,
    rows: &[RoutedRow<'_>],
    failure_policy: FailurePolicy,
) -> Result<(TimestampedRecords, DecodeReport), DecodeError> {
    let mut assembler = RecordAssembler::new(kind);

    for row in rows {
        match decode_row(kind, row.row_index, row.payload) {
            Ok(record) => assembler.insert(row.timestamp, record),
            Err(err) => match failure_policy {
                FailurePolicy::Skip => assembler.skip(row, err),
                FailurePolicy::Abort => return Err(err),
            },
        }
    }

    Ok(assembler.finish())
}

/// The decoded contents of a bag.
///
/// Serializes as `{ "<kind>": { "<timestamp>": { ... } } }`. The report is not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedBag {
    #[serde(flatten)]
    pub records: IndexMap<ChannelKind, TimestampedRecords>,

    #[serde(skip)]
    pub report: DecodeReport,
}

impl DecodedBag {
    pub fn get(&self, kind: ChannelKind) -> Option<&TimestampedRecords> {
        self.records.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.records.keys().copied()
    }

    /// Total number of records across all kinds.
    pub fn num_records(&self) -> usize {
        self.records.values().map(IndexMap::len).sum()
    }
}
