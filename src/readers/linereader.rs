// src/readers/linereader.rs

//! Implements a [`LineReader`], the sequential splitter of a byte stream
//! into newline-terminated lines.

use crate::common::{Bytes, Count, CRu8, FileOffset, NLu8, ResultS3};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;
use std::io::{BufRead, Error};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LineReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`LineReader::read_line`] result; the [`FileOffset`] of the first byte of
/// the line and the line without its terminator.
pub type ResultS3LineRead = ResultS3<(FileOffset, Bytes), Error>;

/// Reads lines from a [`BufRead`], one at a time.
///
/// A line ends at `'\n'`; a trailing `'\r'` is also removed. The final line
/// of a stream need not be terminated.
///
/// The `LineReader` tracks the [`FileOffset`] of each line relative to the
/// `fileoffset` it was created at. After the underlying stream is
/// repositioned a new `LineReader` must be created.
pub struct LineReader<R: BufRead> {
    reader: R,
    /// offset of the next byte to be read
    fileoffset: FileOffset,
    /// offset that this `LineReader` began at
    fileoffset_begin: FileOffset,
    count_lines: Count,
    buffer: Bytes,
}

impl<R: BufRead> fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("fileoffset_begin", &self.fileoffset_begin)
            .field("fileoffset", &self.fileoffset)
            .field("count_lines", &self.count_lines)
            .finish()
    }
}

impl<R: BufRead> LineReader<R> {
    /// Create a `LineReader` for `reader` which is positioned at
    /// `fileoffset`.
    pub fn new(reader: R, fileoffset: FileOffset) -> LineReader<R> {
        defñ!("(…, {})", fileoffset);
        LineReader {
            reader,
            fileoffset,
            fileoffset_begin: fileoffset,
            count_lines: 0,
            buffer: Bytes::with_capacity(256),
        }
    }

    /// Read bytes up to and including the next `'\n'` into the internal
    /// buffer. Returns the count of bytes read, zero at end of stream.
    fn fill_line(&mut self) -> std::io::Result<usize> {
        self.buffer.clear();
        let count_read: usize = self.reader.read_until(NLu8, &mut self.buffer)?;
        self.fileoffset += count_read as FileOffset;
        if count_read != 0 {
            self.count_lines += 1;
        }

        Ok(count_read)
    }

    /// Return the next line and the [`FileOffset`] of its first byte.
    ///
    /// Returns `Done` at end of stream.
    pub fn read_line(&mut self) -> ResultS3LineRead {
        let fo_line: FileOffset = self.fileoffset;
        match self.fill_line() {
            Ok(0) => {
                defñ!("Done at {}", fo_line);
                return ResultS3LineRead::Done;
            }
            Ok(_) => {}
            Err(err) => {
                defñ!("Err at {}; {}", fo_line, err);
                return ResultS3LineRead::Err(err);
            }
        }
        let mut line: Bytes = std::mem::replace(&mut self.buffer, Bytes::with_capacity(256));
        if line.last() == Some(&NLu8) {
            line.pop();
            if line.last() == Some(&CRu8) {
                line.pop();
            }
        }
        #[cfg(any(debug_assertions, test))]
        defñ!("Found at {}: {:?}", fo_line, buffer_to_String_noraw(&line));

        ResultS3LineRead::Found((fo_line, line))
    }

    /// Discard the bytes up to and including the next `'\n'`, i.e. the
    /// remainder of a line that began before the current position.
    ///
    /// Returns the [`FileOffset`] of the following line or `Done` if the
    /// stream ended first.
    pub fn skip_line(&mut self) -> ResultS3<FileOffset, Error> {
        match self.fill_line() {
            Ok(0) => ResultS3::Done,
            Ok(_) if self.buffer.last() != Some(&NLu8) => {
                // the partial line ran to end of stream
                ResultS3::Done
            }
            Ok(_) => {
                defñ!("skipped to {}", self.fileoffset);
                ResultS3::Found(self.fileoffset)
            }
            Err(err) => ResultS3::Err(err),
        }
    }

    /// Offset of the next line to be read.
    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    /// Offset this `LineReader` was created at.
    pub const fn fileoffset_begin(&self) -> FileOffset {
        self.fileoffset_begin
    }

    /// Count of lines read or skipped so far.
    pub const fn count_lines_processed(&self) -> Count {
        self.count_lines
    }
}
