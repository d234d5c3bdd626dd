// src/data/mod.rs

//! The `data` module is specialized data containers and the datetime
//! functions that give them meaning.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is sequence of bytes that:
//!
//! * begin after a prior "line" or the beginning of a stream.
//! * end with a newline character `'\n'` or the end of a stream.
//!
//! The newline (and a preceding `'\r'`) is not part of the "line".
//!
//! A "line" read by a [`LineSource`] is represented by a [`LineData`] and
//! carries the datetime extracted from it.
//!
//! ### Format
//!
//! A [`Format`] is a regular expression for locating and a strftime
//! template for parsing the datetime embedded in a "line".
//!
//! ### Range
//!
//! A [`DateRange`] is the half-open interval `[from, to)` of datetimes
//! to print. It is resolved from user options by [`resolve`].
//!
//! [`LineSource`]: crate::readers::linesource::LineSource
//! [`LineData`]: crate::data::line::LineData
//! [`Format`]: crate::data::datetime::Format
//! [`DateRange`]: crate::data::range::DateRange
//! [`resolve`]: crate::data::range::resolve

pub mod datetime;
pub mod line;
pub mod range;
