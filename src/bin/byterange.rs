use byterange::{ByteRange, extract_range, extract_range_hex};
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use tracing::{Level, debug};

#[derive(Parser, Debug)]
#[command(
    version,
    disable_version_flag = true,
    disable_help_flag = true,
    allow_negative_numbers = true,
    about = "Grab a range of bytes from a file",
    long_about = "Reads (END - BEGIN) bytes from the offset BEGIN of FILE and outputs\nto standard output."
)]
struct Args {
    /// The file to grab bytes from
    file: PathBuf,

    /// The beginning offset to grab bytes from (inclusive)
    #[arg(allow_hyphen_values = true)]
    begin: String,

    /// The ending offset to grab bytes from (exclusive)
    #[arg(allow_hyphen_values = true)]
    end: String,

    /// Render the range as a hex dump instead of raw bytes
    #[arg(long, action = ArgAction::SetTrue)]
    hex: bool,

    /// Log progress to standard error
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Validate before touching the file.
    let range = ByteRange::parse(&args.begin, &args.end)?;
    let mut out = io::stdout().lock();

    let transfer = if args.hex {
        extract_range_hex(&args.file, range, &mut out)?
    } else {
        extract_range(&args.file, range, &mut out)?
    };

    debug!(
        copied = transfer.copied,
        truncated = transfer.truncated(),
        "done"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
