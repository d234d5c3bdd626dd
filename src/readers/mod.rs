// src/readers/mod.rs

//! "Readers" for _dtglib_.
//!
//! ## Overview of readers
//!
//! * A [`StreamMerger`] drives many [`LineSource`s] to write their lines in
//!   datetime order.
//! * A `LineSource` drives a [`LineReader`] to derive [`LineData`s] within
//!   the datetime range.
//! * A `LineSource` of a seekable file first uses the [`seeklocator`] to
//!   skip to the first line at or after `from`.
//! * [`open_source`] opens a user-passed path for a `LineSource`.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`LineData`s]: crate::data::line::LineData
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`LineSource`s]: crate::readers::linesource::LineSource
//! [`StreamMerger`]: crate::readers::streammerger::StreamMerger
//! [`open_source`]: crate::readers::filepreprocessor::open_source

pub mod filepreprocessor;
pub mod linereader;
pub mod linesource;
pub mod seeklocator;
pub mod streammerger;
