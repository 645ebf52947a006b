//! Decodes a ROS 2 sqlite3 bag and prints the result as JSON.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use re_rosbag2::{
    BagReader, ChannelKind, DecodeOptions, DecodeReport, DecodedBag, FailurePolicy,
    KindSelection,
};

#[derive(Debug, Clone, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Path to the `.db3` file.
    bag: PathBuf,

    /// One of `motion`, `gps`, `speed`, `infer` or `all`.
    ///
    /// Anything else decodes all kinds.
    #[clap(default_value = "all")]
    kind: String,

    /// Decode each channel kind on its own thread.
    #[clap(long)]
    parallel: bool,

    /// Fail on the first row that can't be decoded, instead of skipping it.
    #[clap(long)]
    strict: bool,

    /// Pretty-print the JSON output.
    #[clap(long)]
    pretty: bool,

    /// Print the channels of the bag instead of decoding it.
    #[clap(long)]
    list_channels: bool,

    /// Print a summary of skipped rows to stderr.
    #[clap(long)]
    report: bool,
}

/// One line of `--list-channels`.
#[derive(serde::Serialize)]
struct ChannelSummary<'a> {
    #[serde(flatten)]
    channel: &'a re_rosbag2::ChannelDescriptor,
    kind: Option<ChannelKind>,
    message_count: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = <Args as clap::Parser>::parse();
    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.list_channels {
        return list_channels(args);
    }

    let options = DecodeOptions::default()
        .with_parallel(args.parallel)
        .with_failure_policy(if args.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        });

    let selection = KindSelection::parse(&args.kind);
    let bag = re_rosbag2::decode_bag(&args.bag, selection, &options)
        .with_context(|| format!("Failed to decode {selection} from {:?}", args.bag))?;

    if args.report {
        print_report(&bag.report);
    }

    print_json(&bag, args.pretty)?;
    log_summary(&bag);

    Ok(())
}

fn list_channels(args: &Args) -> anyhow::Result<()> {
    let reader = BagReader::open(&args.bag)?;
    let channels = reader.channels()?;
    let counts = reader.message_counts()?;

    let summaries: Vec<_> = channels
        .iter()
        .map(|channel| ChannelSummary {
            channel,
            kind: channel.kind(),
            message_count: counts.get(&channel.id).copied().unwrap_or_default(),
        })
        .collect();

    print_json(&summaries, args.pretty)
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::BufWriter::new(std::io::stdout().lock());
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    stdout.flush().context("Failed to write to stdout")
}

fn print_report(report: &DecodeReport) {
    eprintln!(
        "skipped: {}, overwritten: {}, unknown channel: {}, unsupported: {}",
        report.skipped_count(),
        report.overwritten,
        report.unknown_channel_rows,
        report.unsupported_rows,
    );
    for skipped in &report.skipped {
        eprintln!(
            "  row {} (channel {}, timestamp {}): {:#}",
            skipped.row_index,
            skipped.channel_id,
            skipped.timestamp,
            anyhow::Error::from(skipped.error.clone()),
        );
    }
}

fn log_summary(bag: &DecodedBag) {
    for kind in bag.kinds() {
        if let Some(records) = bag.get(kind) {
            log::info!("{kind}: {} records", records.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["rosbag2_decode", "drive.db3"]).unwrap();
        assert_eq!(args.kind, "all");
        assert!(!args.parallel && !args.strict && !args.list_channels);

        let args = Args::try_parse_from([
            "rosbag2_decode",
            "drive.db3",
            "gps",
            "--parallel",
            "--strict",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(args.bag, PathBuf::from("drive.db3"));
        assert_eq!(KindSelection::parse(&args.kind), KindSelection::One(ChannelKind::Gps));
        assert!(args.parallel && args.strict && args.pretty);
    }

    #[test]
    fn requires_a_bag() {
        assert!(Args::try_parse_from(["rosbag2_decode"]).is_err());
    }
}
