//! Providers of raw line sequences for the [`crate::parser`] variants.
//!
//! - [`file`] — a local log or list file, read whole and closed before parsing.
//! - [`download`] — CI console logs fetched over HTTP, one request per job.

pub mod download;
pub mod file;
