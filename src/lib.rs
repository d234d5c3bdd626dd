// src/lib.rs

//! _dtglib_ is the library of the `dtgrep` program.
//!
//! `dtgrep` prints the lines of chronologically ordered log files whose
//! datetime falls within the range `[from, to)`, merging the lines of many
//! files in datetime order.
//!
//! See [`readers`] for an overview of the processing.

pub mod common;
pub mod data;
pub mod debug;
pub mod readers;
#[cfg(test)]
pub mod tests;
