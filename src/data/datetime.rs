// src/data/datetime.rs

//! Functions to find a datetime substring within a line using a regular
//! expression ("regex") and transform the match to a chrono [`DateTime`].
//!
//! Extracting a datetime from one line requires:
//! 1. searching the bytes of the line for a match of the [`Format`] regex
//! 2. parsing the matched substring with the [`Format`] strftime template
//! 3. if the template has no year then fill in the year of a reference
//!    instant ("now")
//!
//! A `Format` is resolved once from a [`FormatSpec`], either a name in the
//! built-in [`FORMAT_CATALOG`] or a custom strftime template. A custom
//! template without an explicit regex has its regex derived by
//! [`template_to_regex`].
//!
//! The most relevant documents to understand this file are:
//! - `chrono` crate [`strftime`] format.
//! - `regex` crate [Regular Expression syntax].
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
//! [Regular Expression syntax]: https://docs.rs/regex/1.11.1/regex/index.html#syntax

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike, // adds method `.year()` onto `DateTime`
    Duration,
    FixedOffset,
    Local,
    NaiveDate,
    NaiveDateTime,
    TimeZone,
    Utc,
};
use ::chrono::format::{parse, ParseErrorKind, Parsed, StrftimeItems};
use ::const_format::concatcp;
use ::regex::bytes::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime typing, strings, and formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A _Year_ in a date
pub type Year = i32;

/// Crate `chrono` [`strftime`] formatting pattern, passed to
/// chrono [`DateTime::parse_from_str`].
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
/// [`DateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#method.parse_from_str
pub type DateTimePattern_str = str;
pub type DateTimePattern_string = String;

/// Regular expression formatting pattern, passed to [`regex::bytes::Regex`].
///
/// [`regex::bytes::Regex`]: https://docs.rs/regex/1.11.1/regex/bytes/struct.Regex.html
pub type DateTimeRegex_str = str;
pub type DateTimeRegex_string = String;

/// The regular expression "class" used here, specifically for matching
/// datetime substrings within a line.
pub type DateTimeRegex = Regex;

/// A chrono [`DateTime`] type used in _dtglib_.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// Name of an entry in the [`FORMAT_CATALOG`].
pub type FormatName_str = str;

/// Failure to find or parse a datetime in one line.
///
/// Recoverable; the caller decides with the `skip_dateless` and `multiline`
/// options what happens to the line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExtractError {
    /// The [`Format`] regex did not match anywhere in the line.
    NoMatch,
    /// The regex matched but the strftime template could not parse the
    /// matched substring.
    ParseFailure,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NoMatch => write!(f, "no datetime found in line"),
            ExtractError::ParseFailure => write!(f, "datetime substring could not be parsed"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Failure to build a [`Format`]. A configuration error.
#[derive(Debug)]
pub enum FormatError {
    /// The template has a strftime specifier that cannot be matched by a
    /// derived regex or that chrono cannot parse into an instant,
    /// e.g. `%Z`.
    UnknownSpecifier(DateTimePattern_string),
    /// The template has no datetime specifiers at all. Usually an unknown
    /// format name.
    NoSpecifiers(DateTimePattern_string),
    /// The regex did not compile.
    BadRegex(::regex::Error),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownSpecifier(spec) => {
                write!(f, "unsupported strftime specifier {:?}", spec)
            }
            FormatError::NoSpecifiers(template) => {
                write!(f, "{:?} is not a known format name nor a strftime template", template)
            }
            FormatError::BadRegex(err) => write!(f, "bad regular expression: {}", err),
        }
    }
}

impl std::error::Error for FormatError {}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regex patterns for strftime specifiers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`DateTimeRegex_str`] for strftime year specifier `%Y`.
pub const RP_YEAR: &DateTimeRegex_str = r"\d{4}";
/// [`DateTimeRegex_str`] for strftime two-digit specifiers, e.g. `%m`, `%H`.
pub const RP_2D: &DateTimeRegex_str = r"\d{2}";
/// [`DateTimeRegex_str`] for strftime space-padded or unpadded two-digit
/// specifiers, e.g. `%e`, `%-d`, `%k`.
pub const RP_2D_PAD: &DateTimeRegex_str = r"[ \d]?\d";
/// [`DateTimeRegex_str`] for strftime day-of-year specifier `%j`.
pub const RP_3D: &DateTimeRegex_str = r"\d{3}";
/// [`DateTimeRegex_str`] for strftime month specifier `%b`.
pub const RP_MONTHb: &DateTimeRegex_str = r"(?i:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";
/// [`DateTimeRegex_str`] for strftime month specifier `%B`.
pub const RP_MONTHB: &DateTimeRegex_str =
    r"(?i:january|february|march|april|may|june|july|august|september|october|november|december)";
/// [`DateTimeRegex_str`] for strftime day specifier `%a`.
pub const RP_DAYa: &DateTimeRegex_str = r"(?i:mon|tue|wed|thu|fri|sat|sun)";
/// [`DateTimeRegex_str`] for strftime day specifier `%A`.
pub const RP_DAYA: &DateTimeRegex_str = r"(?i:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";
/// [`DateTimeRegex_str`] for strftime specifier `%p`.
pub const RP_AMPM: &DateTimeRegex_str = r"(?i:am|pm)";
/// [`DateTimeRegex_str`] for strftime fractional seconds `%f`.
pub const RP_FRACTIONAL: &DateTimeRegex_str = r"\d{1,9}";
/// [`DateTimeRegex_str`] for strftime optional dot fractional seconds `%.f`.
pub const RP_DOT_FRACTIONAL: &DateTimeRegex_str = r"(?:\.\d{1,9})?";
/// [`DateTimeRegex_str`] for strftime timezone `%z`, e.g. `-0700`.
pub const RP_TZz: &DateTimeRegex_str = r"[+-]\d{2}:?\d{2}";
/// [`DateTimeRegex_str`] for strftime timezone `%:z`, e.g. `-07:00`.
pub const RP_TZcz: &DateTimeRegex_str = r"[+-]\d{2}:\d{2}";
/// [`DateTimeRegex_str`] for strftime timezone `%#z`, e.g. `-07`.
pub const RP_TZpz: &DateTimeRegex_str = r"[+-]\d{2}(?::?\d{2})?";
/// [`DateTimeRegex_str`] for strftime Unix epoch seconds `%s`.
pub const RP_EPOCH: &DateTimeRegex_str = r"\d{1,19}";
/// [`DateTimeRegex_str`] for strftime `%T`, e.g. `12:34:56`.
pub const RP_TIME_T: &DateTimeRegex_str = r"\d{2}:\d{2}:\d{2}";
/// [`DateTimeRegex_str`] for strftime `%F`, e.g. `2001-07-08`.
pub const RP_DATE_F: &DateTimeRegex_str = r"\d{4}-\d{2}-\d{2}";
/// [`DateTimeRegex_str`] for strftime `%+`, RFC 3339.
pub const RP_RFC3339: &DateTimeRegex_str =
    concatcp!(RP_DATE_F, "[Tt ]", RP_TIME_T, RP_DOT_FRACTIONAL, r"(?:[Zz]|[+-]\d{2}:\d{2})");

/// What a strftime template says about the timezone of its datetimes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemplateTz {
    /// No timezone in the template; the [`Format`] fallback offset is used.
    None,
    /// Template has an explicit numeric offset (`%z`, `%:z`, `%#z`, `%+`).
    Explicit,
    /// Template is Unix epoch seconds (`%s`), always UTC.
    Epoch,
}

/// Facts about a strftime template learned by [`template_to_regex`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TemplateInfo {
    pub has_year: bool,
    pub tz: TemplateTz,
    pub count_specifiers: usize,
}

/// One supported strftime specifier: the specifier text (without the
/// leading `%`), its regex, does it carry a year, and its timezone kind.
type SpecifierEntry = (&'static str, &'static DateTimeRegex_str, bool, TemplateTz);

/// Supported strftime specifiers, longest first so that `%:z` is tried
/// before `%z`.
const SPECIFIERS: [SpecifierEntry; 36] = [
    (".3f", r"\.\d{3}", false, TemplateTz::None),
    (".6f", r"\.\d{6}", false, TemplateTz::None),
    (".9f", r"\.\d{9}", false, TemplateTz::None),
    (".f", RP_DOT_FRACTIONAL, false, TemplateTz::None),
    (":z", RP_TZcz, false, TemplateTz::Explicit),
    ("#z", RP_TZpz, false, TemplateTz::Explicit),
    ("3f", r"\d{3}", false, TemplateTz::None),
    ("6f", r"\d{6}", false, TemplateTz::None),
    ("9f", r"\d{9}", false, TemplateTz::None),
    ("Y", RP_YEAR, true, TemplateTz::None),
    ("y", RP_2D, true, TemplateTz::None),
    ("m", RP_2D, false, TemplateTz::None),
    ("d", RP_2D, false, TemplateTz::None),
    ("e", RP_2D_PAD, false, TemplateTz::None),
    ("H", RP_2D, false, TemplateTz::None),
    ("k", RP_2D_PAD, false, TemplateTz::None),
    ("I", RP_2D, false, TemplateTz::None),
    ("l", RP_2D_PAD, false, TemplateTz::None),
    ("M", RP_2D, false, TemplateTz::None),
    ("S", RP_2D, false, TemplateTz::None),
    ("j", RP_3D, false, TemplateTz::None),
    ("b", RP_MONTHb, false, TemplateTz::None),
    ("h", RP_MONTHb, false, TemplateTz::None),
    ("B", RP_MONTHB, false, TemplateTz::None),
    ("a", RP_DAYa, false, TemplateTz::None),
    ("A", RP_DAYA, false, TemplateTz::None),
    ("p", RP_AMPM, false, TemplateTz::None),
    ("P", RP_AMPM, false, TemplateTz::None),
    ("f", RP_FRACTIONAL, false, TemplateTz::None),
    ("z", RP_TZz, false, TemplateTz::Explicit),
    ("s", RP_EPOCH, true, TemplateTz::Epoch),
    ("T", RP_TIME_T, false, TemplateTz::None),
    ("R", r"\d{2}:\d{2}", false, TemplateTz::None),
    ("F", RP_DATE_F, true, TemplateTz::None),
    ("D", r"\d{2}/\d{2}/\d{2}", true, TemplateTz::None),
    ("+", RP_RFC3339, true, TemplateTz::Explicit),
];

/// Numeric specifiers that accept the padding flags `-`, `_`, `0`,
/// e.g. `%-d`.
const SPECIFIERS_PADDABLE: &str = "mdeHkIlMSy";

/// Translate a strftime `template` to a regex that matches the datetime
/// substrings the template can parse. Literal text is escaped.
///
/// For example, `"%b %e %H:%M:%S"` becomes a regex matching `"Jan  2 15:04:05"`.
pub fn template_to_regex(
    template: &DateTimePattern_str,
) -> Result<(DateTimeRegex_string, TemplateInfo), FormatError> {
    defn!("({:?})", template);
    let mut regex_s = DateTimeRegex_string::with_capacity(template.len() * 4);
    let mut info = TemplateInfo {
        has_year: false,
        tz: TemplateTz::None,
        count_specifiers: 0,
    };
    let mut rest: &str = template;
    while let Some(at) = rest.find('%') {
        regex_s.push_str(&::regex::escape(&rest[..at]));
        rest = &rest[at + 1..];
        if let Some(after) = rest.strip_prefix('%') {
            regex_s.push('%');
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix('t') {
            regex_s.push_str(r"\t");
            rest = after;
            continue;
        }
        // padding flag, e.g. `%-d` or `%_H`
        let mut padflag = false;
        if let Some(c) = rest.chars().next() {
            if matches!(c, '-' | '_' | '0') {
                padflag = true;
                rest = &rest[1..];
            }
        }
        let entry = SPECIFIERS
            .iter()
            .find(|(spec, _, _, _)| rest.starts_with(spec));
        let (spec, regex_spec, has_year, tz) = match entry {
            Some(entry) => *entry,
            None => {
                let bad: String = rest.chars().take(1).collect();
                defx!("unsupported specifier %{}", bad);
                return Err(FormatError::UnknownSpecifier(format!("%{}", bad)));
            }
        };
        if padflag {
            if !SPECIFIERS_PADDABLE.contains(spec) {
                return Err(FormatError::UnknownSpecifier(format!("%-{}", spec)));
            }
            regex_s.push_str(RP_2D_PAD);
        } else {
            regex_s.push_str(regex_spec);
        }
        info.has_year |= has_year;
        if tz != TemplateTz::None {
            info.tz = tz;
        }
        info.count_specifiers += 1;
        rest = &rest[spec.len()..];
    }
    regex_s.push_str(&::regex::escape(rest));
    if info.count_specifiers == 0 {
        defx!("no specifiers in {:?}", template);
        return Err(FormatError::NoSpecifiers(template.to_string()));
    }
    defx!("return ({:?}, {:?})", regex_s, info);

    Ok((regex_s, info))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// format catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default format name.
pub const FORMAT_NAME_DEFAULT: &FormatName_str = "rsyslog";

/// Well-known formats: name, regex, strftime template.
pub const FORMAT_CATALOG: [(&FormatName_str, &DateTimeRegex_str, &DateTimePattern_str); 5] = [
    // "Jan  2 15:04:05"
    (
        "rsyslog",
        concatcp!(RP_MONTHb, " ", RP_2D_PAD, " ", RP_TIME_T),
        "%b %e %H:%M:%S",
    ),
    // "2006-01-02T15:04:05Z" or "2006-01-02T15:04:05.123-07:00"
    ("rfc3339", RP_RFC3339, "%+"),
    // "02/Jan/2006:15:04:05 -0700"
    (
        "apache",
        concatcp!(RP_2D, "/", RP_MONTHb, "/", RP_YEAR, ":", RP_TIME_T, " ", RP_TZz),
        "%d/%b/%Y:%H:%M:%S %z",
    ),
    // "2006-01-02 15:04:05"
    ("iso8601", concatcp!(RP_DATE_F, " ", RP_TIME_T), "%Y-%m-%d %H:%M:%S"),
    ("syslog-rfc5424", RP_RFC3339, "%+"),
];

/// Look up `name` in the [`FORMAT_CATALOG`].
pub fn format_catalog_lookup(
    name: &FormatName_str,
) -> Option<(&'static DateTimeRegex_str, &'static DateTimePattern_str)> {
    FORMAT_CATALOG
        .iter()
        .find(|(name_, _, _)| *name_ == name)
        .map(|(_, regex_, template)| (*regex_, *template))
}

/// How the user identified a [`Format`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatSpec {
    /// Name of an entry in the [`FORMAT_CATALOG`].
    Named(String),
    /// A strftime template, with an optional regex. Without a regex then
    /// one is derived from the template.
    Custom {
        pattern: Option<DateTimeRegex_string>,
        template: DateTimePattern_string,
    },
}

impl FormatSpec {
    /// Classify a user-passed format string. A catalog name wins unless an
    /// explicit regex `pattern` is also passed.
    pub fn from_args(format: &str, pattern: Option<String>) -> FormatSpec {
        if pattern.is_none() && format_catalog_lookup(format).is_some() {
            return FormatSpec::Named(format.to_string());
        }

        FormatSpec::Custom {
            pattern,
            template: format.to_string(),
        }
    }

    /// Resolve to a canonical [`Format`].
    pub fn resolve(&self, tz_offset: FixedOffset) -> Result<Format, FormatError> {
        defñ!("{:?}", self);
        match self {
            FormatSpec::Named(name) => match format_catalog_lookup(name) {
                Some((regex_, template)) => Format::new(regex_, template, tz_offset),
                None => Err(FormatError::NoSpecifiers(name.clone())),
            },
            FormatSpec::Custom {
                pattern: Some(pattern),
                template,
            } => Format::new(pattern, template, tz_offset),
            FormatSpec::Custom {
                pattern: None,
                template,
            } => Format::from_template(template, tz_offset),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Format
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A leap year. A template without a year is parsed in this year so that
/// `Feb 29` parses, then the datetime is moved to the year of the reference
/// instant.
const YEAR_LEAP: Year = 2000;

/// A regex for locating and a strftime template for parsing the datetime
/// embedded in a line.
///
/// Immutable after construction; shared by every source.
#[derive(Clone)]
pub struct Format {
    regex: DateTimeRegex,
    pattern: DateTimeRegex_string,
    template: DateTimePattern_string,
    info: TemplateInfo,
    /// used when the template has no timezone
    tz_offset: FixedOffset,
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("pattern", &self.pattern)
            .field("template", &self.template)
            .field("has_year", &self.info.has_year)
            .field("tz", &self.info.tz)
            .field("tz_offset", &self.tz_offset)
            .finish()
    }
}

/// Two `Format`s are equal if their regex and template are equal.
impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.template == other.template
    }
}

impl Eq for Format {}

impl Format {
    /// Create a `Format` from an explicit regex `pattern` and strftime
    /// `template`.
    pub fn new(
        pattern: &DateTimeRegex_str,
        template: &DateTimePattern_str,
        tz_offset: FixedOffset,
    ) -> Result<Format, FormatError> {
        defn!("({:?}, {:?}, {:?})", pattern, template, tz_offset);
        let (_regex_s, info) = template_to_regex(template)?;
        let regex = Regex::new(pattern).map_err(FormatError::BadRegex)?;
        defx!();

        Ok(Format {
            regex,
            pattern: pattern.to_string(),
            template: template.to_string(),
            info,
            tz_offset,
        })
    }

    /// Create a `Format` from a strftime `template`; the regex is derived
    /// from the template.
    pub fn from_template(
        template: &DateTimePattern_str,
        tz_offset: FixedOffset,
    ) -> Result<Format, FormatError> {
        let (regex_s, _info) = template_to_regex(template)?;

        Format::new(&regex_s, template, tz_offset)
    }

    pub fn pattern(&self) -> &DateTimeRegex_str {
        self.pattern.as_str()
    }

    pub fn template(&self) -> &DateTimePattern_str {
        self.template.as_str()
    }

    /// Does the template have a year? If not then [`extract`] fills in the
    /// year of the reference instant.
    ///
    /// [`extract`]: Format::extract
    pub fn has_year(&self) -> bool {
        self.info.has_year
    }

    /// Find and parse the datetime in `line`.
    ///
    /// A template without a year is parsed as occurring in the calendar
    /// year of `now`. A weekday in such a template is not checked against
    /// that year, and `Feb 29` in a non-leap year becomes `Mar 1`.
    pub fn extract(
        &self,
        line: &[u8],
        now: &DateTimeL,
    ) -> Result<DateTimeL, ExtractError> {
        defn!("({:?})", buffer_to_String_noraw(line));
        let match_ = match self.regex.find(line) {
            Some(match_) => match_,
            None => {
                defx!("NoMatch");
                return Err(ExtractError::NoMatch);
            }
        };
        let data: &str = match std::str::from_utf8(match_.as_bytes()) {
            Ok(data) => data,
            Err(_err) => {
                defx!("ParseFailure; {}", _err);
                return Err(ExtractError::ParseFailure);
            }
        };
        let dt_opt: DateTimeLOpt = match self.info.has_year {
            true => datetime_parse_from_str(data, &self.template, self.info.tz, &self.tz_offset),
            false => datetime_parse_yearless(data, &self.template, self.info.tz, &self.tz_offset, now.year()),
        };
        match dt_opt {
            Some(dt) => {
                defx!("return {:?}", dt);
                Ok(dt)
            }
            None => {
                defx!("ParseFailure");
                Err(ExtractError::ParseFailure)
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a [`&str`] to a chrono [`Option<DateTime<FixedOffset>>`]
/// instance.
///
/// Compensate for a missing timezone.
///
/// - `data` to parse that has a datetime string
/// - strftime `pattern` to use for parsing
/// - `tz`, what timezone the `pattern` has
/// - `tz_offset` fallback timezone offset when the `pattern` has no timezone
///
/// A `pattern` without time specifiers is parsed as midnight of that date.
///
/// [`&str`]: str
/// [`Option<DateTime<FixedOffset>>`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub fn datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
    tz: TemplateTz,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defn!("(pattern {:?}, tz {:?}, tz_offset {:?}, data {:?})", pattern, tz, tz_offset, data);
    match tz {
        TemplateTz::Explicit => match DateTime::parse_from_str(data, pattern) {
            Ok(val) => {
                defx!("return Some({:?})", val);
                Some(val)
            }
            Err(_err) => {
                defx!("DateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
                None
            }
        },
        TemplateTz::Epoch => match NaiveDateTime::parse_from_str(data, pattern) {
            Ok(val) => {
                let dt = Utc.from_utc_datetime(&val).with_timezone(tz_offset);
                defx!("return Some({:?})", dt);
                Some(dt)
            }
            Err(_err) => {
                defx!("NaiveDateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
                None
            }
        },
        TemplateTz::None => {
            // no timezone in `pattern` so first convert to a `NaiveDateTime` instance
            let dt_naive: NaiveDateTime = match NaiveDateTime::parse_from_str(data, pattern) {
                Ok(val) => val,
                Err(err) if err.kind() == ParseErrorKind::NotEnough => {
                    // date without a time
                    match NaiveDate::parse_from_str(data, pattern)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                    {
                        Some(val) => val,
                        None => {
                            defx!("NaiveDate::parse_from_str({:?}, {:?}) failed", data, pattern);
                            return None;
                        }
                    }
                }
                Err(_err) => {
                    defx!("NaiveDateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
                    return None;
                }
            };
            // second convert the `NaiveDateTime` instance to `DateTime<FixedOffset>` instance
            let dt = tz_offset
                .from_local_datetime(&dt_naive)
                .single();
            defx!("return {:?}", dt);

            dt
        }
    }
}

/// Parse `data` with a strftime `pattern` that has no year, placing the
/// datetime in `year`.
///
/// The day of the week, if any, is ignored as it belongs to the unknown
/// year of `data`. `Feb 29` moves to `Mar 1` when `year` is not a leap
/// year.
pub fn datetime_parse_yearless(
    data: &str,
    pattern: &DateTimePattern_str,
    tz: TemplateTz,
    tz_offset: &FixedOffset,
    year: Year,
) -> DateTimeLOpt {
    defn!("(pattern {:?}, tz {:?}, tz_offset {:?}, year {}, data {:?})", pattern, tz, tz_offset, year, data);
    let mut parsed = Parsed::new();
    if let Err(_err) = parse(&mut parsed, data, StrftimeItems::new(pattern)) {
        defx!("parse({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
        return None;
    }
    parsed.weekday = None;
    if parsed.set_year(YEAR_LEAP as i64).is_err() {
        defx!("set_year failed");
        return None;
    }
    let dt_naive: NaiveDateTime = match parsed.to_naive_datetime_with_offset(0) {
        Ok(val) => val,
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            // date without a time
            match parsed
                .to_naive_date()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
            {
                Some(val) => val,
                None => {
                    defx!("to_naive_date failed");
                    return None;
                }
            }
        }
        Err(_err) => {
            defx!("to_naive_datetime_with_offset failed ParseError: {}", _err);
            return None;
        }
    };
    let dt_naive: NaiveDateTime = match dt_naive.with_year(year) {
        Some(val) => val,
        // Feb 29 in a non-leap year
        None => match NaiveDate::from_ymd_opt(year, 3, 1) {
            Some(date) => date.and_time(dt_naive.time()),
            None => {
                defx!("year {} out of range", year);
                return None;
            }
        },
    };
    let offset: FixedOffset = match tz {
        TemplateTz::Explicit => match parsed.offset.and_then(FixedOffset::east_opt) {
            Some(val) => val,
            None => {
                defx!("bad offset {:?}", parsed.offset);
                return None;
            }
        },
        TemplateTz::None | TemplateTz::Epoch => *tz_offset,
    };
    let dt = offset
        .from_local_datetime(&dt_naive)
        .single();
    defx!("return {:?}", dt);

    dt
}

/// Transform a timezone string to a `FixedOffset`.
///
/// Accepts `"local"` (the local system offset at `now`), `"UTC"`, `"GMT"`,
/// `"Z"`, or a numeric offset like `"+02:00"`, `"-0800"`, `"+05"`.
pub fn fixedoffset_from_str(tzo: &str) -> Option<FixedOffset> {
    defn!("({:?})", tzo);
    match tzo.to_ascii_lowercase().as_str() {
        "local" => {
            let fo: FixedOffset = *Local::now().offset();
            defx!("return local {:?}", fo);
            return Some(fo);
        }
        "utc" | "gmt" | "z" => {
            defx!("return UTC");
            return FixedOffset::east_opt(0);
        }
        _ => {}
    }
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy `DateTimeL`
    let data: String = format!("2000-01-02 03:04:05 {}", tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(data.as_str(), pattern) {
            defx!("return {:?}", dt.offset());
            return Some(*dt.offset());
        }
    }
    defx!("return None");

    None
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime comparisons
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Describe the result of comparing one [`DateTimeL`] to one DateTime
/// Filter.
#[derive(Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime1 {
    OccursAtOrAfter,
    OccursBefore,
}

impl Result_Filter_DateTime1 {
    /// Returns `true` if the result is `OccursAtOrAfter`.
    #[inline(always)]
    pub const fn is_after(&self) -> bool {
        matches!(*self, Result_Filter_DateTime1::OccursAtOrAfter)
    }
}

/// Describe the result of comparing one [`DateTimeL`] to the half-open
/// range `[from, to)`.
#[derive(Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime2 {
    /// `dt < from`
    BeforeRange,
    /// `from <= dt < to`
    InRange,
    /// `to <= dt`
    AfterRange,
}

/// Compare passed [`DateTimeL`] `dt` to the passed filter `dt_filter`.
///
/// If `dt` is at or after `dt_filter` then return [`OccursAtOrAfter`]<br/>
/// If `dt` is before `dt_filter` then return [`OccursBefore`]
///
/// [`OccursAtOrAfter`]: crate::data::datetime::Result_Filter_DateTime1
/// [`OccursBefore`]: crate::data::datetime::Result_Filter_DateTime1
#[inline(always)]
pub fn dt_after_or_before(
    dt: &DateTimeL,
    dt_filter: &DateTimeL,
) -> Result_Filter_DateTime1 {
    if dt < dt_filter {
        return Result_Filter_DateTime1::OccursBefore;
    }

    Result_Filter_DateTime1::OccursAtOrAfter
}

/// Is `dt` before, inside, or after the half-open range `[from, to)`?
///
/// `dt == from` is `InRange`, `dt == to` is `AfterRange`.
pub fn dt_pass_filters(
    dt: &DateTimeL,
    from: &DateTimeL,
    to: &DateTimeL,
) -> Result_Filter_DateTime2 {
    defñ!("({:?}, {:?}, {:?})", dt, from, to);
    if dt < from {
        return Result_Filter_DateTime2::BeforeRange;
    }
    if to <= dt {
        return Result_Filter_DateTime2::AfterRange;
    }

    Result_Filter_DateTime2::InRange
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// other miscellaneous DateTime function helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Create a [`DateTimeL`] from year, month, day, hour, minute, second at
/// the given offset. Returns `None` for an impossible datetime.
pub fn ymdhms(
    fixedoffset: &FixedOffset,
    year: Year,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeLOpt {
    fixedoffset
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
}

/// The zero-value instant, `0001-01-01T00:00:00Z`, the lower bound when no
/// `from` is given.
pub fn datetime_epoch() -> DateTimeL {
    DateTime::<Utc>::from_timestamp(EPOCH_ZERO_TIMESTAMP, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .fixed_offset()
}

/// Unix timestamp of `0001-01-01T00:00:00Z`.
pub const EPOCH_ZERO_TIMESTAMP: i64 = -62_135_596_800;
