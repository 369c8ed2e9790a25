//! File output for rating results.

pub mod export;
