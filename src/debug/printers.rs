// src/debug/printers.rs

//! Printer macros for user-facing errors and warnings, and helpers for
//! rendering raw bytes in debug messages.

use ::bstr::ByteSlice; // provides `.chars()` on `&[u8]`

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! an `warn`ing
#[macro_export]
macro_rules! de_wrn {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("WARNING: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_wrn;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `warn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transform control characters to their "Control Pictures" counterpart,
/// e.g. `'\n'` becomes `'␊'`, so a debug message stays on one line.
pub const fn char_to_char_noraw(c: char) -> char {
    // https://www.fileformat.info/info/unicode/block/control_pictures/images.htm
    match c as u32 {
        0 => '␀',
        9 => '␉', // '\t'
        10 => '␊', // '\n'
        11 => '␋',
        12 => '␌',
        13 => '␍', // '\r'
        27 => '␛', // '\e'
        127 => '␡',
        1..=31 => '�',
        _ => c,
    }
}

/// Transform a buffer of bytes to a non-raw `String`.
/// The bytes may be invalid UTF-8; invalid sequences become `'�'`.
#[allow(non_snake_case)]
pub fn buffer_to_String_noraw(buffer: &[u8]) -> String {
    let mut s2: String = String::with_capacity(buffer.len() + 1);
    for c in buffer.chars() {
        s2.push(char_to_char_noraw(c));
    }

    s2
}
