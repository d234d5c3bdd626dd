// src/tests/mod.rs

//! Tests for _dtglib_.
//!
//! Tests are placed at `src/tests/`, inside the `dtglib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
pub mod filepreprocessor_tests;
pub mod linesource_tests;
