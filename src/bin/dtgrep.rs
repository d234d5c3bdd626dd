// src/bin/dtgrep.rs

//! Driver program _dtgrep_ drives the [_dtglib_].
//!
//! Processes user-passed command-line arguments into a datetime range
//! `[from, to)` and a datetime [`Format`].
//! Then opens each path passed, standard input if none, as a [`LineSource`].
//! A seekable file is searched for the first line at or after `from`;
//! compressed files and standard input are read from the beginning.
//!
//! A [`StreamMerger`] writes the in-range lines of all sources to STDOUT in
//! datetime order.
//!
//! The reference instant "now" is captured once at start.
//!
//! [_dtglib_]: dtglib
//! [`Format`]: dtglib::data::datetime::Format
//! [`LineSource`]: dtglib::readers::linesource::LineSource
//! [`StreamMerger`]: dtglib::readers::streammerger::StreamMerger

#![allow(non_camel_case_types)]

use std::io::BufWriter;
use std::process::ExitCode;
use std::sync::Arc;

use ::anyhow::{bail, Context};
use ::clap::Parser;
use ::const_format::concatcp;
use ::dtglib::common::{Count, FPath, FPaths, FPATH_STDIN};
use ::dtglib::data::datetime::{
    fixedoffset_from_str,
    DateTimeL,
    DateTimeLOpt,
    Duration,
    FixedOffset,
    Format,
    FormatSpec,
    Local,
    FORMAT_CATALOG,
    FORMAT_NAME_DEFAULT,
};
use ::dtglib::data::range::{
    datespec_parse,
    duration_parse,
    resolve,
    DateRange,
    Options,
    DATESPEC_PATTERNS,
    DATESPEC_PATTERNS_TZ,
};
use ::dtglib::debug::printers::{e_err, e_wrn};
use ::dtglib::readers::filepreprocessor::open_source;
use ::dtglib::readers::linesource::LineSource;
use ::dtglib::readers::streammerger::StreamMerger;
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// --------------------
// command-line parsing

/// Environment variable for the default `--format`.
const CLI_FORMAT_ENV: &str = "DTGREP_FORMAT";

/// Default `--location`.
const CLI_LOCATION_DEFAULT: &str = "local";

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Each PATH must be chronologically ordered. Lines from all PATHs are merged in
datetime order. A PATH of \"-\", or no PATH, reads standard input.
PATHs ending \".gz\" or \".z\" are gzip decompressed, PATHs ending \".bz2\" or
\".bz\" are bzip2 decompressed. Plain files are binary searched for FROM.

FROM and TO may be \"now\", RFC 3339, or one of:
    \"",
    DATESPEC_PATTERNS[0], "\"\n    \"",
    DATESPEC_PATTERNS[1], "\"\n    \"",
    DATESPEC_PATTERNS[2], "\"\n    \"",
    DATESPEC_PATTERNS[3], "\"\n    \"",
    DATESPEC_PATTERNS[4], "\"\n    \"",
    DATESPEC_PATTERNS[5], "\"\n    \"",
    DATESPEC_PATTERNS[6], "\"\n    \"",
    DATESPEC_PATTERNS[7], "\"\n    \"",
    DATESPEC_PATTERNS_TZ[0], "\"\n    \"",
    DATESPEC_PATTERNS_TZ[1], "\"\n",
    "\
Values without a timezone offset are in the LOCATION timezone.

DURATION is a signed sequence of decimal numbers with a unit suffix,
\"ns\", \"us\", \"ms\", \"s\", \"m\", \"h\", e.g. \"1h30m\", \"-15m\", \"2.5s\".
DURATION alone ends at now, truncated to the hour, minute, or second.

FORMAT is a strftime template, e.g. \"%Y-%m-%d %H:%M:%S\", or a name:
    ",
    FORMAT_CATALOG[0].0, " \"", FORMAT_CATALOG[0].2, "\"\n    ",
    FORMAT_CATALOG[1].0, " \"", FORMAT_CATALOG[1].2, "\"\n    ",
    FORMAT_CATALOG[2].0, " \"", FORMAT_CATALOG[2].2, "\"\n    ",
    FORMAT_CATALOG[3].0, " \"", FORMAT_CATALOG[3].2, "\"\n    ",
    FORMAT_CATALOG[4].0, " \"", FORMAT_CATALOG[4].2, "\"\n",
    "A template without a year is parsed in the current year.",
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "dtgrep",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path(s) of chronologically ordered log files.
    /// "-" is standard input. If no paths are passed then standard input is
    /// read.
    #[clap(verbatim_doc_comment)]
    paths: Vec<String>,

    /// Print lines with a datetime at or after FROM.
    /// If not passed then all lines before TO are printed.
    #[clap(
        short = 'f',
        long,
        verbatim_doc_comment,
    )]
    from: Option<String>,

    /// Print lines with a datetime before TO.
    /// If not passed then TO is now.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
    )]
    to: Option<String>,

    /// Length of the range; used with one of FROM or TO, or alone.
    #[clap(
        short = 'd',
        long,
        verbatim_doc_comment,
        allow_hyphen_values = true,
        value_parser = cli_process_duration,
    )]
    duration: Option<Duration>,

    /// Format of the datetime in each line; a format name or a strftime
    /// template.
    #[clap(
        short = 'F',
        long,
        verbatim_doc_comment,
        env = CLI_FORMAT_ENV,
        default_value = FORMAT_NAME_DEFAULT,
    )]
    format: String,

    /// Regular expression that matches the datetime in each line.
    /// If not passed then it is derived from FORMAT.
    #[clap(
        short = 'p',
        long,
        verbatim_doc_comment,
    )]
    pattern: Option<String>,

    /// Skip lines without a datetime. If not passed then a line without a
    /// datetime aborts.
    #[clap(
        short = 's',
        long = "skip-dateless",
        verbatim_doc_comment,
    )]
    skip_dateless: bool,

    /// Print lines without a datetime that follow a printed line, e.g. a
    /// stack trace.
    #[clap(
        short = 'm',
        long,
        verbatim_doc_comment,
    )]
    multiline: bool,

    /// Timezone offset for datetimes without a timezone, including FROM and
    /// TO. Example values, "local", "UTC", "+02:00", "-0800", "+05".
    /// To pass a value with leading "-" use "=" notation, e.g. "-l=-0800".
    #[clap(
        short = 'l',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value = CLI_LOCATION_DEFAULT,
    )]
    location: FixedOffset,
}

/// CLI argument processing
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    match fixedoffset_from_str(tzo) {
        Some(fo) => Ok(fo),
        None => Err(format!("Unable to parse a timezone offset from {:?}", tzo)),
    }
}

/// CLI argument processing
fn cli_process_duration(val: &str) -> std::result::Result<Duration, String> {
    duration_parse(val).map_err(|err| err.to_string())
}

/// Transform the user-passed `paths` into the sources to read.
/// No paths is standard input.
fn cli_process_paths(paths: Vec<String>) -> anyhow::Result<FPaths> {
    if paths.is_empty() {
        return Ok(vec![FPath::from(FPATH_STDIN)]);
    }
    if paths.iter().filter(|path| path.as_str() == FPATH_STDIN).count() > 1 {
        bail!("standard input {:?} may be passed only once", FPATH_STDIN);
    }

    Ok(paths)
}

/// Resolve the user-passed range arguments.
fn cli_process_range(
    args: &CLI_Args,
    now: &DateTimeL,
) -> anyhow::Result<DateRange> {
    let from_opt: DateTimeLOpt = args
        .from
        .as_deref()
        .map(|datespec| datespec_parse(datespec, &args.location, now))
        .transpose()
        .context("option --from")?;
    let to_opt: DateTimeLOpt = args
        .to
        .as_deref()
        .map(|datespec| datespec_parse(datespec, &args.location, now))
        .transpose()
        .context("option --to")?;
    if args.duration.map(|duration| duration.is_zero()).unwrap_or(false) {
        e_wrn!("option --duration of zero is ignored");
    }
    let range: DateRange = resolve(from_opt, to_opt, args.duration, now)?;
    defo!("range {:?}", range);

    Ok(range)
}

// -----------
// processing

/// Process the user-passed command-line arguments and write the merged
/// lines to STDOUT. Returns the count of lines written.
fn run(
    args: CLI_Args,
    now: DateTimeL,
) -> anyhow::Result<Count> {
    defn!();
    let range: DateRange = cli_process_range(&args, &now)?;
    let format: Format = FormatSpec::from_args(&args.format, args.pattern.clone())
        .resolve(args.location)
        .with_context(|| format!("option --format {:?}", args.format))?;
    defo!("format {:?}", format);
    let format: Arc<Format> = Arc::new(format);
    let options: Options = Options::new(&range, args.skip_dateless, args.multiline);
    let paths: FPaths = cli_process_paths(args.paths)?;

    let mut sources: Vec<LineSource> = Vec::with_capacity(paths.len());
    for path in paths.into_iter() {
        let input = open_source(&path)?;
        let source = LineSource::from_input(path, input, format.clone(), options, now, true)?;
        defo!("source {:?}", source);
        sources.push(source);
    }

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let mut merger = StreamMerger::new(sources);
    let count: Count = match merger.merge(&mut writer) {
        Ok(count) => count,
        // the reader of STDOUT went away, e.g. `dtgrep … | head`
        Err(err) if err.is_broken_pipe() => {
            defo!("broken pipe");
            merger.count_lines_written()
        }
        Err(err) => {
            defx!("error {}", err);
            return Err(err.into());
        }
    };
    defx!("wrote {} lines", count);

    Ok(count)
}

/// Process the user-passed command-line arguments.
/// Determine a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    // the one reference instant for all processing
    let now: DateTimeL = Local::now().with_timezone(&args.location);

    let exitcode = match run(args, now) {
        Ok(_count) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
