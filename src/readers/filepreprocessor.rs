// src/readers/filepreprocessor.rs

//! Classify a user-passed path and open it as a [`SourceInput`]: standard
//! input, a gzip or bzip2 compressed file, or a plain seekable file.
//!
//! Only plain files can be seeked; compressed files and standard input are
//! read from their beginning.

use crate::common::{FPath, FileSz, ReadSeek, SourceError, FPATH_STDIN};

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
use ::flate2::read::MultiGzDecoder;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FileType
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How a source is read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileType {
    /// standard input, see [`FPATH_STDIN`]
    Stdin,
    /// gzip compressed file, extension `.gz` or `.z`
    Gz,
    /// bzip2 compressed file, extension `.bz2` or `.bz`
    Bz2,
    /// any other file, read as plain text
    File,
}

impl FileType {
    /// May a source of this type be repositioned?
    pub const fn is_seekable(&self) -> bool {
        matches!(self, FileType::File)
    }
}

/// Classify `path` by name. The file is not accessed.
pub fn fpath_to_filetype(path: &FPath) -> FileType {
    if path == FPATH_STDIN {
        defñ!("({:?}) Stdin", path);
        return FileType::Stdin;
    }
    let filetype: FileType = match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("gz") | Some("z") => FileType::Gz,
        Some("bz2") | Some("bz") => FileType::Bz2,
        _ => FileType::File,
    };
    defñ!("({:?}) {:?}", path, filetype);

    filetype
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SourceInput
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An opened source byte stream.
pub enum SourceInput {
    /// A stream that may be repositioned, with its size in bytes.
    Seekable {
        reader: Box<dyn ReadSeek>,
        filesz: FileSz,
    },
    /// A stream that can only be read forward.
    Sequential(Box<dyn Read>),
}

impl fmt::Debug for SourceInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceInput::Seekable { filesz, .. } => {
                write!(f, "SourceInput::Seekable {{ filesz: {} }}", filesz)
            }
            SourceInput::Sequential(_) => write!(f, "SourceInput::Sequential"),
        }
    }
}

impl SourceInput {
    pub const fn is_seekable(&self) -> bool {
        matches!(self, SourceInput::Seekable { .. })
    }
}

/// Open the source named by `path` according to its [`FileType`].
pub fn open_source(path: &FPath) -> Result<SourceInput, SourceError> {
    defn!("({:?})", path);
    let filetype: FileType = fpath_to_filetype(path);
    if filetype == FileType::Stdin {
        defx!("stdin");
        return Ok(SourceInput::Sequential(Box::new(std::io::stdin().lock())));
    }
    let file: File = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            defx!("File::open({:?}) error {}", path, err);
            return Err(SourceError::io(path, err));
        }
    };
    let input: SourceInput = match filetype {
        FileType::Gz => SourceInput::Sequential(Box::new(MultiGzDecoder::new(file))),
        FileType::Bz2 => SourceInput::Sequential(Box::new(Bz2DecoderReader::new(file))),
        FileType::File | FileType::Stdin => {
            let metadata = file
                .metadata()
                .map_err(|err| SourceError::io(path, err))?;
            if metadata.is_dir() {
                let err = std::io::Error::new(std::io::ErrorKind::Other, "is a directory");
                defx!("{:?} is a directory", path);
                return Err(SourceError::io(path, err));
            }
            match metadata.is_file() {
                true => SourceInput::Seekable {
                    reader: Box::new(file),
                    filesz: metadata.len(),
                },
                // e.g. a named pipe or `/dev/stdin`
                false => SourceInput::Sequential(Box::new(file)),
            }
        }
    };
    defx!("{:?}", input);

    Ok(input)
}
