// src/readers/seeklocator.rs

//! Find the first line at or after `from` in a seekable source by binary
//! search over fixed-size blocks, without reading the whole source.
//!
//! Each probe seeks to a block boundary, discards the partial line there,
//! and reads forward to the first line with a datetime. The search narrows
//! to two adjacent blocks; a final forward scan from the lower block finds
//! the exact line.
//!
//! Sources must be chronologically ordered for the result to be meaningful.

use crate::common::{FPath, FileOffset, FileSz, ReadSeek, ResultS3, SourceError};
use crate::data::datetime::{dt_after_or_before, DateTimeL, Format, Result_Filter_DateTime1};
use crate::data::range::Options;
use crate::readers::linereader::LineReader;

use std::io::{BufRead, BufReader, Seek, SeekFrom};

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Block Size in bytes
pub type BlockSz = u64;

/// Index of a block, i.e. `FileOffset / BlockSz`.
pub type BlockIndex = u64;

/// Default probe block size.
pub const BLOCKSZ: BlockSz = 4096;

/// [`locate`] result. `Found` is the [`FileOffset`] of the first line at or
/// after `from`. `Done` means no such line exists.
pub type ResultS3Locate = ResultS3<FileOffset, SourceError>;

/// Read lines from `linereader` until one has a datetime.
///
/// Returns `None` at end of stream. A line without a datetime is passed
/// over if the `options` allow it, else it is an error.
fn read_next_datetime<R: BufRead>(
    linereader: &mut LineReader<R>,
    path: &FPath,
    format: &Format,
    options: &Options,
    now: &DateTimeL,
) -> Result<Option<(FileOffset, DateTimeL)>, SourceError> {
    loop {
        let (fo, line) = match linereader.read_line() {
            ResultS3::Found(val) => val,
            ResultS3::Done => return Ok(None),
            ResultS3::Err(err) => return Err(SourceError::io(path, err)),
        };
        match format.extract(&line, now) {
            Ok(dt) => return Ok(Some((fo, dt))),
            Err(_err) if options.ignore_errors() => {
                defo!("pass over line at {}; {}", fo, _err);
            }
            Err(_err) => {
                return Err(SourceError::Dateless {
                    path: path.clone(),
                    line,
                });
            }
        }
    }
}

/// Create a [`LineReader`] positioned at the first full line at or after
/// block `index`. Returns `None` if there is no such line.
fn linereader_at_block<'a, F: ReadSeek + ?Sized>(
    file: &'a mut F,
    path: &FPath,
    index: BlockIndex,
    blocksz: BlockSz,
) -> Result<Option<LineReader<BufReader<&'a mut F>>>, SourceError> {
    let fo: FileOffset = index * blocksz;
    file.seek(SeekFrom::Start(fo))
        .map_err(|err| SourceError::io(path, err))?;
    let mut linereader = LineReader::new(BufReader::new(file), fo);
    if index == 0 {
        return Ok(Some(linereader));
    }
    // the block boundary is most likely inside a line
    match linereader.skip_line() {
        ResultS3::Found(_) => Ok(Some(linereader)),
        ResultS3::Done => Ok(None),
        ResultS3::Err(err) => Err(SourceError::io(path, err)),
    }
}

/// Find the [`FileOffset`] of the first line with datetime at or after
/// `options.from` using block size [`BLOCKSZ`].
pub fn locate<F: ReadSeek + ?Sized>(
    file: &mut F,
    filesz: FileSz,
    path: &FPath,
    format: &Format,
    options: &Options,
    now: &DateTimeL,
) -> ResultS3Locate {
    locate_blocksz(file, filesz, path, format, options, now, BLOCKSZ)
}

/// Find the [`FileOffset`] of the first line with datetime at or after
/// `options.from`, probing blocks of `blocksz` bytes.
///
/// Blocks `[0, low]` are known to start before `from`, blocks
/// `[high, filesz / blocksz]` are known to start at or after `from`. A probe
/// that reaches the end of the file without a datetime counts as at or
/// after `from`.
pub fn locate_blocksz<F: ReadSeek + ?Sized>(
    file: &mut F,
    filesz: FileSz,
    path: &FPath,
    format: &Format,
    options: &Options,
    now: &DateTimeL,
    blocksz: BlockSz,
) -> ResultS3Locate {
    defn!("({:?}, filesz {}, blocksz {}, from {:?})", path, filesz, blocksz, options.from);
    debug_assert_ne!(blocksz, 0, "blocksz must not be zero");
    let mut low: BlockIndex = 0;
    let mut high: BlockIndex = filesz / blocksz.max(1);
    while high - low > 1 {
        let mid: BlockIndex = low + (high - low) / 2;
        let probe: Option<(FileOffset, DateTimeL)> =
            match linereader_at_block(&mut *file, path, mid, blocksz) {
                Ok(Some(mut linereader)) => {
                    match read_next_datetime(&mut linereader, path, format, options, now) {
                        Ok(val) => val,
                        Err(err) => {
                            defx!("probe block {} error {}", mid, err);
                            return ResultS3Locate::Err(err);
                        }
                    }
                }
                Ok(None) => None,
                Err(err) => {
                    defx!("probe block {} error {}", mid, err);
                    return ResultS3Locate::Err(err);
                }
            };
        match probe {
            Some((_fo, dt)) => match dt_after_or_before(&dt, &options.from) {
                Result_Filter_DateTime1::OccursBefore => {
                    defo!("block {} line at {} {:?} before from", mid, _fo, dt);
                    low = mid;
                }
                Result_Filter_DateTime1::OccursAtOrAfter => {
                    defo!("block {} line at {} {:?} at or after from", mid, _fo, dt);
                    high = mid;
                }
            },
            None => {
                defo!("block {} no datetime before end of file", mid);
                high = mid;
            }
        }
    }
    debug_assert_le!(low, high);

    // scan forward from the lower block to the first line at or after `from`
    let mut linereader = match linereader_at_block(&mut *file, path, low, blocksz) {
        Ok(Some(linereader)) => linereader,
        Ok(None) => {
            defx!("Done; no line after block {}", low);
            return ResultS3Locate::Done;
        }
        Err(err) => return ResultS3Locate::Err(err),
    };
    loop {
        match read_next_datetime(&mut linereader, path, format, options, now) {
            Ok(Some((fo, dt))) => {
                if dt_after_or_before(&dt, &options.from).is_after() {
                    defx!("Found {} {:?}", fo, dt);
                    return ResultS3Locate::Found(fo);
                }
            }
            Ok(None) => {
                defx!("Done; no line at or after from");
                return ResultS3Locate::Done;
            }
            Err(err) => {
                defx!("Err {}", err);
                return ResultS3Locate::Err(err);
            }
        }
    }
}
