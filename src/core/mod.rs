//! Core matching engine
//!
//! Pure text canonicalization and category scoring. No I/O, no shared
//! mutable state; safe to run concurrently against the same collection.

pub mod matcher;
pub mod normalizer;
