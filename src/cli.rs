// Idiomatic Rust CLI for Lockdiff.
//
// Mode-flag surface rather than subcommands: `--diff` (the default) and
// `--restore` select the walk, and three positionals name the files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};

use crate::changelist::{RecordReader, RecordWriter};
use crate::diff;
use crate::restore;
use crate::stream::{ByteSink, ByteSource};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024;

/// Output filename used when the third positional is omitted.
const DEFAULT_OUTPUT: &str = "a.out";

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Position-locked binary diff and restore.
#[derive(Parser, Debug)]
#[command(
    name = "lockdiff",
    version,
    about = "Position-locked binary diff/restore",
    arg_required_else_help = true
)]
struct Cli {
    /// Compare <OLD> to <NEW> and write a change list (the default mode).
    #[arg(long, conflicts_with = "restore")]
    diff: bool,

    /// Rebuild a file from <OLD> and the change list <NEW>.
    #[arg(long)]
    restore: bool,

    /// Original file.
    old: PathBuf,

    /// Modified file (diff mode) or change list (restore mode).
    new: PathBuf,

    /// Output file.
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json")]
    json_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Diff,
    Restore,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.restore { Mode::Restore } else { Mode::Diff }
    }
}

// ---------------------------------------------------------------------------
// Diff mode
// ---------------------------------------------------------------------------

fn cmd_diff(cli: &Cli) -> i32 {
    let old_file = match File::open(&cli.old) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: old file: {}: {e}", cli.old.display());
            return 1;
        }
    };
    let new_file = match File::open(&cli.new) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: new file: {}: {e}", cli.new.display());
            return 1;
        }
    };
    let out_file = match File::create(&cli.output) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: output file: {}: {e}", cli.output.display());
            return 1;
        }
    };

    let mut old_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, old_file));
    let mut new_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, new_file));
    let mut writer = RecordWriter::new(BufWriter::with_capacity(BUF_SIZE, out_file));

    let summary = match diff::diff(&mut old_src, &mut new_src, &mut writer) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("lockdiff: diff error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("lockdiff: write flush error: {e}");
        return 1;
    }

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "lockdiff: diff: old size: {}, new size: {}, records: {}",
            summary.old_size,
            summary.new_size,
            summary.records()
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "old_size": summary.old_size,
            "new_size": summary.new_size,
            "changes": summary.changes,
            "deletes": summary.deletes,
            "inserts": summary.inserts,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Restore mode
// ---------------------------------------------------------------------------

fn cmd_restore(cli: &Cli) -> i32 {
    let old_file = match File::open(&cli.old) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: old file: {}: {e}", cli.old.display());
            return 1;
        }
    };
    let delta_file = match File::open(&cli.new) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: change list: {}: {e}", cli.new.display());
            return 1;
        }
    };
    let out_file = match File::create(&cli.output) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("lockdiff: output file: {}: {e}", cli.output.display());
            return 1;
        }
    };

    let mut old_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, old_file));
    let mut reader = RecordReader::new(BufReader::with_capacity(BUF_SIZE, delta_file));
    let mut sink = ByteSink::new(BufWriter::with_capacity(BUF_SIZE, out_file));

    let summary = match restore::restore(&mut old_src, &mut reader, &mut sink) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("lockdiff: restore error: {e}");
            return 1;
        }
    };

    if let Err(e) = sink.flush() {
        eprintln!("lockdiff: write flush error: {e}");
        return 1;
    }

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "lockdiff: restore: {} records, output size: {}",
            summary.records, summary.output_size
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "restore",
            "old_size": summary.old_size,
            "records": summary.records,
            "output_size": summary.output_size,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches modes.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.mode() {
        Mode::Diff => cmd_diff(&cli),
        Mode::Restore => cmd_restore(&cli),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
