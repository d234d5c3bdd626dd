// src/data/range.rs

//! Resolve user-passed `from`, `to`, and `duration` values into a
//! validated half-open [`DateRange`] `[from, to)`, and parse the user
//! strings for those values.
//!
//! Resolution, first matching row wins:
//!
//! | from | to  | duration | result                                              |
//! |------|-----|----------|-----------------------------------------------------|
//! | yes  | yes | yes      | error [`RangeError::ConflictingSpec`]               |
//! | no   | no  | no       | `from` = epoch, `to` = now                          |
//! | no   | no  | yes      | `to` = now truncated per [`duration_truncate_unit`], `from` = `to` - duration |
//! | no   | yes | yes      | `from` = `to` - duration                            |
//! | yes  | no  | yes      | `to` = `from` + duration                            |
//! | any  | any | no       | as given; missing `from` is epoch, missing `to` is now |
//!
//! A zero duration is the same as no duration.

use crate::data::datetime::{
    datetime_epoch,
    datetime_parse_from_str,
    dt_pass_filters,
    DateTime,
    DateTimeL,
    DateTimeLOpt,
    DateTimePattern_str,
    Duration,
    FixedOffset,
    Result_Filter_DateTime2,
    TemplateTz,
    Utc,
};

use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateRange
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The half-open datetime interval `[from, to)`. Always `from < to`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateRange {
    pub from: DateTimeL,
    pub to: DateTimeL,
}

/// A configuration error while resolving a [`DateRange`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RangeError {
    /// `duration` was passed with both `from` and `to`.
    ConflictingSpec,
    /// The resolved `from` is not before `to`.
    InvalidRange { from: DateTimeL, to: DateTimeL },
    /// A datetime string could not be parsed.
    BadDateSpec(String),
    /// A duration string could not be parsed.
    BadDuration(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::ConflictingSpec => {
                write!(f, "--duration can only be used with either --from or --to")
            }
            RangeError::InvalidRange { from, to } => {
                write!(f, "start date {} must be before end date {}", from, to)
            }
            RangeError::BadDateSpec(val) => write!(f, "unable to parse a datetime from {:?}", val),
            RangeError::BadDuration(val) => write!(f, "unable to parse a duration from {:?}", val),
        }
    }
}

impl std::error::Error for RangeError {}

/// Truncation granularity of "now" for a `duration` passed alone:
/// one hour if `duration` is at least an hour, else one minute if at least a
/// minute, else one second.
pub fn duration_truncate_unit(duration: &Duration) -> Duration {
    if *duration >= Duration::hours(1) {
        Duration::hours(1)
    } else if *duration >= Duration::minutes(1) {
        Duration::minutes(1)
    } else {
        Duration::seconds(1)
    }
}

/// Truncate `dt` down to a multiple of `unit` since the Unix epoch,
/// keeping the offset of `dt`.
pub fn datetime_truncate(dt: &DateTimeL, unit: &Duration) -> DateTimeL {
    let unit_s: i64 = unit.num_seconds().max(1);
    let ts: i64 = dt.timestamp();
    let ts_trunc: i64 = ts - ts.rem_euclid(unit_s);
    match DateTime::<Utc>::from_timestamp(ts_trunc, 0) {
        Some(dtu) => dtu.with_timezone(dt.offset()),
        None => *dt,
    }
}

/// Combine optional `from`, `to`, and `duration` into a validated
/// [`DateRange`]. `now` is the reference instant, captured once by the
/// caller.
pub fn resolve(
    from_opt: DateTimeLOpt,
    to_opt: DateTimeLOpt,
    duration_opt: Option<Duration>,
    now: &DateTimeL,
) -> Result<DateRange, RangeError> {
    defn!("({:?}, {:?}, {:?}, {:?})", from_opt, to_opt, duration_opt, now);
    let duration_opt = duration_opt.filter(|duration| !duration.is_zero());
    let (from, to): (DateTimeL, DateTimeL) = match (from_opt, to_opt, duration_opt) {
        (Some(_), Some(_), Some(_)) => {
            defx!("ConflictingSpec");
            return Err(RangeError::ConflictingSpec);
        }
        (None, None, Some(duration)) => {
            let unit = duration_truncate_unit(&duration);
            let to = datetime_truncate(now, &unit);
            defo!("truncated now {:?} to {:?} (unit {:?})", now, to, unit);
            (to - duration, to)
        }
        (None, Some(to), Some(duration)) => (to - duration, to),
        (Some(from), None, Some(duration)) => (from, from + duration),
        (from_opt, to_opt, None) => (
            from_opt.unwrap_or_else(datetime_epoch),
            to_opt.unwrap_or(*now),
        ),
    };
    if from >= to {
        defx!("InvalidRange {:?} {:?}", from, to);
        return Err(RangeError::InvalidRange { from, to });
    }
    defx!("return [{:?}, {:?})", from, to);

    Ok(DateRange { from, to })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The filtering options shared by every source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    pub from: DateTimeL,
    pub to: DateTimeL,
    /// drop lines without a datetime
    pub skip_dateless: bool,
    /// pass through lines without a datetime after an in-range line
    pub multiline: bool,
}

impl Options {
    pub fn new(range: &DateRange, skip_dateless: bool, multiline: bool) -> Options {
        Options {
            from: range.from,
            to: range.to,
            skip_dateless,
            multiline,
        }
    }

    /// May a line without a datetime be passed over without aborting?
    pub const fn ignore_errors(&self) -> bool {
        self.skip_dateless || self.multiline
    }

    /// Where is `dt` relative to `[from, to)`?
    pub fn pass_filters(&self, dt: &DateTimeL) -> Result_Filter_DateTime2 {
        dt_pass_filters(dt, &self.from, &self.to)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// user string parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The literal datespec that means the reference instant.
pub const DATESPEC_NOW: &str = "now";

/// strftime patterns tried in order for a datespec without an offset,
/// after RFC 3339.
pub const DATESPEC_PATTERNS: [&DateTimePattern_str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%d",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// strftime patterns tried in order for a datespec with a numeric offset.
pub const DATESPEC_PATTERNS_TZ: [&DateTimePattern_str; 2] = [
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y%m%dT%H%M%S%z",
];

/// Transform a user-passed datespec into a [`DateTimeL`].
///
/// Accepts `"now"`, RFC 3339, or one of [`DATESPEC_PATTERNS`] interpreted at
/// `tz_offset`, or one of [`DATESPEC_PATTERNS_TZ`].
pub fn datespec_parse(
    datespec: &str,
    tz_offset: &FixedOffset,
    now: &DateTimeL,
) -> Result<DateTimeL, RangeError> {
    defn!("({:?}, {:?}, {:?})", datespec, tz_offset, now);
    let datespec_ = datespec.trim();
    if datespec_.eq_ignore_ascii_case(DATESPEC_NOW) {
        defx!("return now {:?}", now);
        return Ok(*now);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(datespec_) {
        defx!("return RFC 3339 {:?}", dt);
        return Ok(dt);
    }
    for pattern in DATESPEC_PATTERNS_TZ.iter() {
        if let Some(dt) = datetime_parse_from_str(datespec_, pattern, TemplateTz::Explicit, tz_offset) {
            defx!("return {:?} (pattern {:?})", dt, pattern);
            return Ok(dt);
        }
    }
    for pattern in DATESPEC_PATTERNS.iter() {
        if let Some(dt) = datetime_parse_from_str(datespec_, pattern, TemplateTz::None, tz_offset) {
            defx!("return {:?} (pattern {:?})", dt, pattern);
            return Ok(dt);
        }
    }
    defx!("BadDateSpec");

    Err(RangeError::BadDateSpec(datespec.to_string()))
}

lazy_static! {
    /// Whole duration string like Go `time.ParseDuration`, e.g. `"-1h30m"`.
    static ref REGEX_DURATION: Regex = Regex::new(
        r"^([+-])?((?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+)$"
    ).unwrap();
    /// One component of a duration string, e.g. `"1.5h"`.
    static ref REGEX_DURATION_PART: Regex = Regex::new(
        r"(\d*)(?:\.(\d*))?(ns|us|µs|μs|ms|s|m|h)"
    ).unwrap();
}

/// Nanoseconds per duration unit.
fn duration_unit_nanos(unit: &str) -> i128 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        _ => 3_600 * 1_000_000_000,
    }
}

/// Parse a signed duration string like `"1h30m"`, `"-15m"`, `"2.5s"`,
/// `"300ms"`. A bare `"0"` is zero.
pub fn duration_parse(val: &str) -> Result<Duration, RangeError> {
    defn!("({:?})", val);
    let val_ = val.trim();
    if matches!(val_, "0" | "+0" | "-0") {
        defx!("return zero");
        return Ok(Duration::zero());
    }
    let bad = || RangeError::BadDuration(val.to_string());
    let captures = REGEX_DURATION
        .captures(val_)
        .ok_or_else(bad)?;
    let negative: bool = captures.get(1).map(|m| m.as_str() == "-").unwrap_or(false);
    let parts: &str = captures.get(2).map(|m| m.as_str()).ok_or_else(bad)?;
    let mut nanos: i128 = 0;
    for part in REGEX_DURATION_PART.captures_iter(parts) {
        let whole_s: &str = part.get(1).map(|m| m.as_str()).unwrap_or("");
        let frac_s: &str = part.get(2).map(|m| m.as_str()).unwrap_or("");
        let unit: i128 = duration_unit_nanos(part.get(3).map(|m| m.as_str()).unwrap_or("h"));
        let whole: i128 = match whole_s.is_empty() {
            true => 0,
            false => whole_s.parse::<i128>().map_err(|_| bad())?,
        };
        nanos = nanos
            .checked_add(whole.checked_mul(unit).ok_or_else(bad)?)
            .ok_or_else(bad)?;
        // fractional digits beyond nanosecond precision are dropped
        let mut scale: i128 = unit;
        for digit in frac_s.chars().filter_map(|c| c.to_digit(10)) {
            scale /= 10;
            if scale == 0 {
                break;
            }
            nanos += digit as i128 * scale;
        }
        defo!("part {:?} nanos {}", part.get(0).map(|m| m.as_str()), nanos);
    }
    if negative {
        nanos = -nanos;
    }
    let nanos_i64: i64 = i64::try_from(nanos).map_err(|_| bad())?;
    let duration = Duration::nanoseconds(nanos_i64);
    defx!("return {:?}", duration);

    Ok(duration)
}
