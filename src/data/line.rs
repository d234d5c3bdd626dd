// src/data/line.rs

//! Implement [`LineData`], one line read from a source along with its
//! datetime.
//!
//! [`LineData`]: crate::data::line::LineData

use crate::common::{Bytes, FileOffset};
use crate::data::datetime::DateTimeL;
use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One line of a source, without its line terminator, and the datetime it
/// is ordered by.
///
/// A _continuation_ line has no datetime of its own; it is a line passed
/// through by the `multiline` option and carries the datetime of the
/// preceding dated line of the same source.
pub struct LineData {
    /// byte offset of the first byte of the line in the source stream
    fileoffset: FileOffset,
    /// the exact line bytes
    bytes: Bytes,
    dt: DateTimeL,
    continuation: bool,
}

impl fmt::Debug for LineData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineData")
            .field("fileoffset", &self.fileoffset)
            .field("dt", &self.dt)
            .field("continuation", &self.continuation)
            .field("bytes", &buffer_to_String_noraw(&self.bytes))
            .finish()
    }
}

impl LineData {
    /// A line with its own datetime.
    pub fn new(fileoffset: FileOffset, bytes: Bytes, dt: DateTimeL) -> LineData {
        LineData {
            fileoffset,
            bytes,
            dt,
            continuation: false,
        }
    }

    /// A dateless line that inherits `dt` from the line it continues.
    pub fn new_continuation(fileoffset: FileOffset, bytes: Bytes, dt: DateTimeL) -> LineData {
        LineData {
            fileoffset,
            bytes,
            dt,
            continuation: true,
        }
    }

    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    /// The line bytes, without line terminator.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub const fn dt(&self) -> &DateTimeL {
        &self.dt
    }

    pub const fn is_continuation(&self) -> bool {
        self.continuation
    }
}
