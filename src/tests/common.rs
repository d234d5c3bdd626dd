// src/tests/common.rs

//! Common data and helpers for tests.

#![allow(non_upper_case_globals)]

use crate::common::{Count, FPath, SourceError};
use crate::data::datetime::{
    ymdhms,
    DateTimeL,
    Duration,
    FixedOffset,
    Format,
    FormatSpec,
};
use crate::data::range::{DateRange, Options};
use crate::readers::filepreprocessor::SourceInput;
use crate::readers::linesource::LineSource;
use crate::readers::streammerger::StreamMerger;

use std::io::Cursor;
use std::sync::Arc;

use ::lazy_static::lazy_static;

/// UTC offset.
pub const FO_0: FixedOffset = match FixedOffset::east_opt(0) {
    Some(fo) => fo,
    None => panic!("bad offset"),
};

/// Offset `+02:00`.
pub const FO_P2: FixedOffset = match FixedOffset::east_opt(2 * 3600) {
    Some(fo) => fo,
    None => panic!("bad offset"),
};

/// A UTC datetime.
pub fn dt_utc(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    ymdhms(&FO_0, year, month, day, hour, min, sec).unwrap()
}

lazy_static! {
    /// reference instant `2024-03-01T00:00:00Z`
    pub static ref NOW_2024: DateTimeL = dt_utc(2024, 3, 1, 0, 0, 0);

    /// `%Y-%m-%d %H:%M:%S` at UTC
    pub static ref FORMAT_ISO: Arc<Format> = Arc::new(
        FormatSpec::from_args("iso8601", None).resolve(FO_0).unwrap()
    );

    /// `%b %e %H:%M:%S` at UTC
    pub static ref FORMAT_RSYSLOG: Arc<Format> = Arc::new(
        FormatSpec::from_args("rsyslog", None).resolve(FO_0).unwrap()
    );
}

/// [`Options`] for the range `[from, to)`.
pub fn options(
    from: DateTimeL,
    to: DateTimeL,
    skip_dateless: bool,
    multiline: bool,
) -> Options {
    Options::new(&DateRange { from, to }, skip_dateless, multiline)
}

/// A seekable in-memory [`SourceInput`].
pub fn input_seekable(data: &[u8]) -> SourceInput {
    SourceInput::Seekable {
        reader: Box::new(Cursor::new(data.to_vec())),
        filesz: data.len() as u64,
    }
}

/// A sequential in-memory [`SourceInput`].
pub fn input_sequential(data: &[u8]) -> SourceInput {
    SourceInput::Sequential(Box::new(Cursor::new(data.to_vec())))
}

/// A [`LineSource`] over in-memory `data`.
pub fn linesource(
    data: &str,
    format: &Arc<Format>,
    options: Options,
    use_seek: bool,
) -> LineSource {
    LineSource::from_input(
        FPath::from("test"),
        input_seekable(data.as_bytes()),
        format.clone(),
        options,
        *NOW_2024,
        use_seek,
    )
    .unwrap()
}

/// Merge `sources` and return the merge result and the output.
pub fn merge_to_string(sources: Vec<LineSource>) -> (Result<Count, SourceError>, String) {
    let mut output: Vec<u8> = Vec::new();
    let mut merger = StreamMerger::new(sources);
    let result = merger.merge(&mut output);

    (result, String::from_utf8(output).unwrap())
}

/// Generate `count` lines in [`FORMAT_ISO`] starting at `start`, `step`
/// apart, e.g. `"2024-01-01 00:00:00 message 0"`.
pub fn generate_lines(
    start: DateTimeL,
    step: Duration,
    count: usize,
) -> String {
    let mut data = String::with_capacity(count * 40);
    for i in 0..count {
        let dt = start + step * (i as i32);
        data.push_str(&format!("{} message {}\n", dt.format("%Y-%m-%d %H:%M:%S"), i));
    }

    data
}
