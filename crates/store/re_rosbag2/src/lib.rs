//! Decodes vehicle data out of ROS 2 sqlite3 bags (`.db3`).
//!
//! A bag is read in four steps:
//! 1. [`BagReader`] loads the `topics` and `messages` tables.
//! 2. [`router::route`] sorts rows into one batch per [`ChannelKind`], based on the topic type.
//! 3. [`schema::decode_payload`] turns each CDR payload into a [`DecodedRecord`].
//! 4. [`assembler`] collects the records into timestamp-keyed maps, one per kind.
//!
//! [`decode_bag`] does all of the above.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use re_rosbag2::{ChannelKind, DecodeOptions, KindSelection};
//!
//! let bag = re_rosbag2::decode_bag(
//!     Path::new("drive.db3"),
//!     KindSelection::One(ChannelKind::Gps),
//!     &DecodeOptions::default(),
//! )?;
//! for (timestamp, fix) in bag.get(ChannelKind::Gps).into_iter().flatten() {
//!     println!("{timestamp}: {fix:?}");
//! }
//! # Ok::<(), re_rosbag2::ContainerError>(())
//! ```

pub mod assembler;
mod error;
mod options;
pub mod router;
pub mod schema;
mod storage;

use std::path::Path;

use rayon::prelude::*;

pub use self::{
    assembler::{DecodeReport, DecodedBag, SkippedRow, TimestampedRecords},
    error::{ContainerError, DecodeError},
    options::{DecodeOptions, FailurePolicy},
    router::KindSelection,
    schema::{ChannelKind, DecodedRecord, Gps, Motion, Speed},
    storage::{BagReader, ChannelDescriptor, ChannelId, ChannelTable, Row},
};

/// Opens the bag at `path` and decodes the selected kinds.
pub fn decode_bag(
    path: &Path,
    selection: KindSelection,
    options: &DecodeOptions,
) -> Result<DecodedBag, ContainerError> {
    let reader = BagReader::open(path)?;

    let channels = reader.channels()?;
    log::debug!("{path:?} has {} channels", channels.len());

    let message_count = reader.message_count()?;
    log::info!("Decoding {selection} from {message_count} messages in {path:?}");

    let rows = reader.rows()?;

    Ok(decode_rows(&channels, &rows, selection, options)?)
}

/// Decodes already loaded rows.
///
/// Only fails under [`FailurePolicy::Abort`], with the error of the earliest bad row.
pub fn decode_rows(
    channels: &ChannelTable,
    rows: &[Row],
    selection: KindSelection,
    options: &DecodeOptions,
) -> Result<DecodedBag, DecodeError> {
    let routed = router::route(channels, rows, selection);
    let policy = options.failure_policy;

    let batches: Vec<_> = routed.batches.into_iter().collect();
    let assembled: Vec<_> = if options.parallel {
        batches
            .into_par_iter()
            .map(|(kind, rows)| (kind, assembler::assemble_kind(kind, &rows, policy)))
            .collect()
    } else {
        batches
            .into_iter()
            .map(|(kind, rows)| (kind, assembler::assemble_kind(kind, &rows, policy)))
            .collect()
    };

    let mut bag = DecodedBag {
        records: Default::default(),
        report: DecodeReport {
            unknown_channel_rows: routed.unknown_channel_rows,
            unsupported_rows: routed.unsupported_rows,
            ..Default::default()
        },
    };
    let mut first_error: Option<DecodeError> = None;

    for (kind, result) in assembled {
        match result {
            Ok((records, report)) => {
                bag.records.insert(kind, records);
                bag.report.merge(report);
            }
            Err(err) => {
                if first_error
                    .as_ref()
                    .is_none_or(|first| err.row_index() < first.row_index())
                {
                    first_error = Some(err);
                }
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    bag.report.skipped.sort_by_key(|skipped| skipped.row_index);

    if !bag.report.is_clean() {
        log::warn!(
            "Skipped {} rows that failed to decode, overwrote {} rows with duplicate timestamps",
            bag.report.skipped_count(),
            bag.report.overwritten,
        );
    }

    Ok(bag)
}
