// src/readers/linesource.rs

//! Implements a [`LineSource`], one input's cursor over its in-range lines.
//!
//! A `LineSource` first skips lines before `from` (the seek phase), then
//! yields each line in `[from, to)` one at a time (the stream phase). It
//! ends at the first line at or after `to`, or at end of stream.
//!
//! ```text
//!            line < from, or dateless and skipped
//!              ┌──────┐
//!              ▼      │
//!          ┌─────────────┐  from <= line < to  ┌─────────┐
//!  start ─►│   Seeking   │────────────────────►│ InRange │◄─┐ line in range,
//!          └─────────────┘                     └─────────┘──┘ continuation
//!            │        │ line >= to, or EOF      │       │
//!            │        └──────────────┐          │       │ line >= to, or EOF
//!            │ dateless, not allowed ▼          │       ▼
//!            │                 ┌───────────┐    │  ┌───────────┐
//!            └────────────────►│   Fatal   │◄───┘  │ Exhausted │
//!                              └───────────┘       └───────────┘
//! ```
//!
//! A source that the [`seeklocator`] proved to have no line at or after
//! `from` begins and stays in `OutOfRange`.
//!
//! [`seeklocator`]: crate::readers::seeklocator

use crate::common::{Bytes, Count, FPath, FileOffset, ResultS3, SourceError};
use crate::data::datetime::{DateTimeL, DateTimeLOpt, ExtractError, Format, Result_Filter_DateTime2};
use crate::data::line::LineData;
use crate::data::range::Options;
use crate::debug::printers::de_wrn;
use crate::readers::filepreprocessor::SourceInput;
use crate::readers::linereader::LineReader;
use crate::readers::seeklocator::{locate, ResultS3Locate};

use std::fmt;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::sync::Arc;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// The line-splitting reader owned by a [`LineSource`].
pub type SourceLineReader = LineReader<Box<dyn BufRead>>;

/// Where a [`LineSource`] is in its life.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineSourceStatus {
    /// no line in range has been found yet
    Seeking,
    /// the buffered line is in range
    InRange,
    /// the source has no line in range, it was never read
    OutOfRange,
    /// a line at or after `to`, or end of stream, was reached
    Exhausted,
    /// an unrecoverable error occurred
    Fatal,
}

impl LineSourceStatus {
    /// Will the source yield no more lines?
    pub const fn is_done(&self) -> bool {
        matches!(
            self,
            LineSourceStatus::OutOfRange | LineSourceStatus::Exhausted | LineSourceStatus::Fatal
        )
    }
}

/// What a line read is, relative to the range.
#[derive(Debug)]
enum LineClass {
    Dated(DateTimeL, Result_Filter_DateTime2),
    Dateless(ExtractError),
}

/// What [`LineSource::advance`] does after classifying one line.
#[derive(Debug, Eq, PartialEq)]
enum Step {
    /// the line was passed over, read another
    Continue,
    /// a line is buffered, or the source is done
    Stop,
}

/// A chronologically ordered input filtered to the range `[from, to)`.
///
/// The `LineSource` buffers at most one line, its [`current`] line.
///
/// [`current`]: LineSource::current
pub struct LineSource {
    path: FPath,
    /// `None` after the source is done; dropping it closes the stream
    linereader: Option<SourceLineReader>,
    format: Arc<Format>,
    options: Options,
    /// reference instant for year-less datetimes
    now: DateTimeL,
    current: Option<LineData>,
    status: LineSourceStatus,
    /// datetime of the most recent in-range line, inherited by
    /// continuation lines
    dt_last: DateTimeLOpt,
    count_lines_read: Count,
}

impl fmt::Debug for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LineSource")
            .field("path", &self.path)
            .field("status", &self.status)
            .field("current", &self.current)
            .field("dt_last", &self.dt_last)
            .field("count_lines_read", &self.count_lines_read)
            .finish()
    }
}

impl LineSource {
    /// Create a `LineSource` reading lines from `reader`, which is
    /// positioned at `fileoffset`.
    pub fn new(
        path: FPath,
        reader: Box<dyn BufRead>,
        fileoffset: FileOffset,
        format: Arc<Format>,
        options: Options,
        now: DateTimeL,
    ) -> LineSource {
        defñ!("({:?}, {})", path, fileoffset);
        LineSource {
            path,
            linereader: Some(LineReader::new(reader, fileoffset)),
            format,
            options,
            now,
            current: None,
            status: LineSourceStatus::Seeking,
            dt_last: None,
            count_lines_read: 0,
        }
    }

    /// Create a `LineSource` that is known to have no line in range.
    pub fn new_out_of_range(
        path: FPath,
        format: Arc<Format>,
        options: Options,
        now: DateTimeL,
    ) -> LineSource {
        defñ!("({:?})", path);
        LineSource {
            path,
            linereader: None,
            format,
            options,
            now,
            current: None,
            status: LineSourceStatus::OutOfRange,
            dt_last: None,
            count_lines_read: 0,
        }
    }

    /// Create a `LineSource` from an opened `input`.
    ///
    /// A seekable `input` is first positioned with the [`seeklocator`] if
    /// `use_seek` is `true`, else it is read from the beginning like a
    /// sequential `input`.
    ///
    /// [`seeklocator`]: crate::readers::seeklocator
    pub fn from_input(
        path: FPath,
        input: SourceInput,
        format: Arc<Format>,
        options: Options,
        now: DateTimeL,
        use_seek: bool,
    ) -> Result<LineSource, SourceError> {
        defn!("({:?}, {:?}, use_seek {})", path, input, use_seek);
        match input {
            SourceInput::Sequential(reader) => {
                defx!("sequential");
                Ok(LineSource::new(path, Box::new(BufReader::new(reader)), 0, format, options, now))
            }
            SourceInput::Seekable { mut reader, filesz } => {
                let fileoffset: FileOffset = match use_seek {
                    true => match locate(&mut *reader, filesz, &path, &format, &options, &now) {
                        ResultS3Locate::Found(fo) => fo,
                        ResultS3Locate::Done => {
                            defx!("out of range");
                            return Ok(LineSource::new_out_of_range(path, format, options, now));
                        }
                        ResultS3Locate::Err(err) => {
                            defx!("error {}", err);
                            return Err(err);
                        }
                    },
                    false => 0,
                };
                if let Err(err) = reader.seek(SeekFrom::Start(fileoffset)) {
                    defx!("seek error {}", err);
                    return Err(SourceError::io(&path, err));
                }
                defx!("seekable at {}", fileoffset);
                Ok(LineSource::new(path, Box::new(BufReader::new(reader)), fileoffset, format, options, now))
            }
        }
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn status(&self) -> LineSourceStatus {
        self.status
    }

    /// The buffered line, if any. It is in range, or a continuation of an
    /// in-range line.
    pub const fn current(&self) -> Option<&LineData> {
        self.current.as_ref()
    }

    /// Remove and return the buffered line.
    pub fn take_current(&mut self) -> Option<LineData> {
        self.current.take()
    }

    /// Count of lines read from the stream.
    pub const fn count_lines_read(&self) -> Count {
        self.count_lines_read
    }

    /// The source is done; release the stream.
    fn finish(&mut self, status: LineSourceStatus) {
        defñ!("({:?}) {:?}", self.path, status);
        debug_assert!(status.is_done(), "finish with status {:?}", status);
        self.status = status;
        self.current = None;
        self.linereader = None;
    }

    /// Act upon one classified line.
    fn transition(
        &mut self,
        fileoffset: FileOffset,
        line: Bytes,
        class: LineClass,
    ) -> Result<Step, SourceError> {
        match (self.status, class) {
            (LineSourceStatus::InRange, LineClass::Dateless(_)) if self.options.multiline => {
                match self.dt_last {
                    Some(dt) => {
                        self.current = Some(LineData::new_continuation(fileoffset, line, dt));
                        Ok(Step::Stop)
                    }
                    None => Ok(Step::Continue),
                }
            }
            (LineSourceStatus::Seeking | LineSourceStatus::InRange, LineClass::Dateless(_err)) => {
                if self.options.ignore_errors() {
                    defo!("pass over dateless line at {}; {}", fileoffset, _err);
                    return Ok(Step::Continue);
                }
                self.finish(LineSourceStatus::Fatal);
                Err(SourceError::Dateless {
                    path: self.path.clone(),
                    line,
                })
            }
            (_, LineClass::Dateless(_)) => {
                // a done source reads no more lines
                Ok(Step::Stop)
            }
            (status, LineClass::Dated(_dt, Result_Filter_DateTime2::BeforeRange)) => {
                if status == LineSourceStatus::InRange {
                    de_wrn!("{:?}: line at {} {:?} is out of order, dropped", self.path, fileoffset, _dt);
                }
                defo!("pass over line at {} {:?} before range", fileoffset, _dt);
                Ok(Step::Continue)
            }
            (_, LineClass::Dated(_dt, Result_Filter_DateTime2::AfterRange)) => {
                defo!("line at {} {:?} after range", fileoffset, _dt);
                self.finish(LineSourceStatus::Exhausted);
                Ok(Step::Stop)
            }
            (_, LineClass::Dated(dt, Result_Filter_DateTime2::InRange)) => {
                self.status = LineSourceStatus::InRange;
                self.dt_last = Some(dt);
                self.current = Some(LineData::new(fileoffset, line, dt));
                Ok(Step::Stop)
            }
        }
    }

    /// Discard the buffered line and buffer the next line to emit, or
    /// become done.
    ///
    /// Returns an `Err` if the stream could not be read or a line without a
    /// datetime may not be passed over; the status is then
    /// [`LineSourceStatus::Fatal`].
    pub fn advance(&mut self) -> Result<(), SourceError> {
        defn!("({:?}) status {:?}", self.path, self.status);
        self.current = None;
        if self.status.is_done() {
            defx!("already done");
            return Ok(());
        }
        loop {
            let linereader: &mut SourceLineReader = match self.linereader.as_mut() {
                Some(linereader) => linereader,
                None => {
                    self.finish(LineSourceStatus::Exhausted);
                    defx!("no reader");
                    return Ok(());
                }
            };
            let (fileoffset, line) = match linereader.read_line() {
                ResultS3::Found(val) => val,
                ResultS3::Done => {
                    self.finish(LineSourceStatus::Exhausted);
                    defx!("end of stream");
                    return Ok(());
                }
                ResultS3::Err(err) => {
                    self.finish(LineSourceStatus::Fatal);
                    defx!("read error {}", err);
                    return Err(SourceError::io(&self.path, err));
                }
            };
            self.count_lines_read += 1;
            let class: LineClass = match self.format.extract(&line, &self.now) {
                Ok(dt) => LineClass::Dated(dt, self.options.pass_filters(&dt)),
                Err(err) => LineClass::Dateless(err),
            };
            match self.transition(fileoffset, line, class) {
                Ok(Step::Continue) => continue,
                Ok(Step::Stop) => {
                    defx!("status {:?}, current {:?}", self.status, self.current);
                    return Ok(());
                }
                Err(err) => {
                    defx!("error {}", err);
                    return Err(err);
                }
            }
        }
    }
}
