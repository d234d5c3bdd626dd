// src/tests/filepreprocessor_tests.rs

//! tests for `filepreprocessor.rs`

#![allow(non_snake_case)]

use crate::common::{FPath, SourceError};
use crate::debug::helpers::{create_temp_file, create_temp_file_with_suffix, ntf_fpath};
use crate::readers::filepreprocessor::{fpath_to_filetype, open_source, FileType, SourceInput};

use std::io::{Read, Write};

use ::flate2::write::GzEncoder;
use ::flate2::Compression;
use ::test_case::test_case;

#[test_case("-", FileType::Stdin)]
#[test_case("/var/log/syslog", FileType::File)]
#[test_case("/var/log/syslog.1", FileType::File)]
#[test_case("/var/log/syslog.2.gz", FileType::Gz)]
#[test_case("app.log.z", FileType::Gz)]
#[test_case("app.log.bz2", FileType::Bz2)]
#[test_case("app.log.bz", FileType::Bz2)]
#[test_case("app.log.gz.txt", FileType::File)]
#[test_case("./-", FileType::File; "dash path")]
#[test_case("gz", FileType::File; "no extension")]
fn test_fpath_to_filetype(path: &str, expect: FileType) {
    let filetype = fpath_to_filetype(&FPath::from(path));
    assert_eq!(filetype, expect);
    assert_eq!(filetype.is_seekable(), expect == FileType::File);
}

fn read_all(input: SourceInput) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::new();
    match input {
        SourceInput::Seekable { mut reader, .. } => reader.read_to_end(&mut buffer).unwrap(),
        SourceInput::Sequential(mut reader) => reader.read_to_end(&mut buffer).unwrap(),
    };

    buffer
}

const DATA: &str = "2024-01-01 00:00:00 one\n2024-01-01 00:00:01 two\n";

#[test]
fn test_open_source_file() {
    let ntf = create_temp_file(DATA);
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    assert!(input.is_seekable(), "{:?}", input);
    match &input {
        SourceInput::Seekable { filesz, .. } => assert_eq!(*filesz, DATA.len() as u64),
        SourceInput::Sequential(_) => unreachable!(),
    }
    assert_eq!(read_all(input), DATA.as_bytes());
}

#[test]
fn test_open_source_gz() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DATA.as_bytes()).unwrap();
    let gz: Vec<u8> = encoder.finish().unwrap();
    let ntf = create_temp_file_with_suffix(&gz, ".gz");
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    assert!(!input.is_seekable(), "{:?}", input);
    assert_eq!(read_all(input), DATA.as_bytes());
}

#[test]
fn test_open_source_gz_multiple_members() {
    let mut gz: Vec<u8> = Vec::new();
    for part in DATA.split_inclusive('\n') {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(part.as_bytes()).unwrap();
        gz.extend(encoder.finish().unwrap());
    }
    let ntf = create_temp_file_with_suffix(&gz, ".gz");
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    assert_eq!(read_all(input), DATA.as_bytes());
}

#[test]
fn test_open_source_gz_corrupt() {
    let ntf = create_temp_file_with_suffix(b"this is not gzip data\n", ".gz");
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    match input {
        SourceInput::Sequential(mut reader) => {
            assert!(reader.read_to_end(&mut buffer).is_err());
        }
        SourceInput::Seekable { .. } => panic!("expected Sequential"),
    }
}

/// `DATA` compressed by `bzip2`
const DATA_BZ2: [u8; 67] = [
    0x42, 0x5a, 0x68, 0x39, 0x31, 0x41, 0x59, 0x26, 0x53, 0x59, 0x10, 0x86, 0x3e, 0xa3, 0x00, 0x00,
    0x10, 0x59, 0x80, 0x00, 0x10, 0x40, 0x02, 0x74, 0x10, 0x02, 0x01, 0x84, 0x80, 0x20, 0x00, 0x31,
    0x00, 0xd0, 0x00, 0x94, 0xd2, 0x1a, 0x62, 0x69, 0x75, 0x04, 0x26, 0x91, 0xe8, 0xe8, 0xa4, 0x48,
    0xa3, 0x6c, 0x14, 0x21, 0xc4, 0x17, 0x79, 0x26, 0x7c, 0x5d, 0xc9, 0x14, 0xe1, 0x42, 0x40, 0x42,
    0x18, 0xfa, 0x8c,
];

#[test_case(".bz2")]
#[test_case(".bz")]
fn test_open_source_bz2(suffix: &str) {
    let ntf = create_temp_file_with_suffix(&DATA_BZ2, suffix);
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    assert!(!input.is_seekable(), "{:?}", input);
    assert_eq!(read_all(input), DATA.as_bytes());
}

#[test]
fn test_open_source_bz2_corrupt() {
    let ntf = create_temp_file_with_suffix(b"this is not bzip2 data\n", ".bz2");
    let input = open_source(&ntf_fpath(&ntf)).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    match input {
        SourceInput::Sequential(mut reader) => {
            let err = reader.read_to_end(&mut buffer).unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        }
        SourceInput::Seekable { .. } => panic!("expected Sequential"),
    }
}

#[test]
fn test_open_source_missing() {
    let path = FPath::from("/this/path/does/not/exist.log");
    match open_source(&path) {
        Err(SourceError::Io { path: path_err, err }) => {
            assert_eq!(path_err, path);
            assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        }
        ret => panic!("expected Err(Io), got {:?}", ret),
    }
}

#[test]
fn test_open_source_directory() {
    let dir = ::tempfile::tempdir().unwrap();
    let path = FPath::from(dir.path().to_str().unwrap());
    assert!(matches!(open_source(&path), Err(SourceError::Io { .. })));
}
