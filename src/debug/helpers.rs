// src/debug/helpers.rs

//! Temporary file helpers for testing.

use crate::common::FPath;

use std::io::Write; // for `NamedTempFile.write_all`

use ::lazy_static::lazy_static;
use ::si_trace_print::defñ;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-dtgrep-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `[u8]` to a temporary file with the
/// file name `suffix`, e.g. `".gz"`.
pub fn create_temp_file_with_suffix(data: &[u8], suffix: &str) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .suffix::<str>(suffix)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    match ntf.flush() {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::flush() return Err {}", err);
        }
    }
    defñ!("created {:?}", ntf.path());

    ntf
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_with_suffix(data.as_bytes(), "")
}
