// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

//! Common imports, type aliases, and the [`ResultS3`] result type shared by
//! the readers.

#![allow(non_upper_case_globals)]

use std::fmt;
use std::io::{Read, Seek};

use ::bstr::ByteSlice; // provides `.as_bstr()` on `&[u8]`

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`.
///
/// Also names a source that is not a file, e.g. [`FPATH_STDIN`].
pub type FPath = String;
pub type FPaths = Vec<FPath>;

/// The special path that means "read standard input".
pub const FPATH_STDIN: &str = "-";

/// Offset into a file or stream in bytes. Zero based.
pub type FileOffset = u64;

/// File size in bytes.
pub type FileSz = u64;

/// A general-purpose counting type.
pub type Count = u64;

/// A sequence of bytes, e.g. one line without its line terminator.
pub type Bytes = Vec<u8>;

/// Newline byte.
pub const NLu8: u8 = b'\n';

/// Carriage return byte.
pub const CRu8: u8 = b'\r';

/// A byte stream that can be read and repositioned.
///
/// Plain files are `ReadSeek`; decompressed streams and standard input are
/// not.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enums for various *Reader functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Extended
/// for searching functions that may legitimately find nothing.
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// Nothing to return, but no bad errors happened, e.g. end of file
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is [`Done`].
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }

    /// Converts from `ResultS3<T, E>` to [`Option<T>`], discarding the
    /// error, if any.
    #[inline(always)]
    pub fn ok(self) -> Option<T> {
        match self {
            ResultS3::Found(x) => Some(x),
            ResultS3::Done => None,
            ResultS3::Err(_) => None,
        }
    }
}

impl<T, E> fmt::Display for ResultS3<T, E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultS3::Found(_) => write!(f, "ResultS3::Found"),
            ResultS3::Done => write!(f, "ResultS3::Done"),
            ResultS3::Err(err) => write!(f, "ResultS3::Err({})", err),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// source errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An unrecoverable error of one source, or of writing the output.
///
/// Returned up to the merge loop which decides the run is over.
#[derive(Debug)]
pub enum SourceError {
    /// Opening, seeking, or reading the source failed.
    Io { path: FPath, err: std::io::Error },
    /// A line without a datetime was found and neither `skip_dateless` nor
    /// `multiline` allow passing over it.
    Dateless { path: FPath, line: Bytes },
    /// Writing the output failed.
    Write(std::io::Error),
}

impl SourceError {
    pub fn io(path: &FPath, err: std::io::Error) -> SourceError {
        SourceError::Io {
            path: path.clone(),
            err,
        }
    }

    /// Was the output closed by the reader, e.g. `dtgrep … | head`?
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, SourceError::Write(err) if err.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, err } => write!(f, "{:?}: {}", path, err),
            SourceError::Dateless { path, line } => {
                write!(f, "Aborting. Found line without date in {:?}: {}", path, line.as_bstr())
            }
            SourceError::Write(err) => write!(f, "writing output failed: {}", err),
        }
    }
}

impl std::error::Error for SourceError {}
