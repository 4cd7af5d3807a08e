//! Shared setup for the fen demo binaries.

pub mod common;
