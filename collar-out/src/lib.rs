//! Append-only output writer for decoded collar sensor recordings.
//!
//! This crate owns only the output side of the contract: given the chunk
//! buffers that [`collar_in::run`] produces for each processed chunk, it
//! lays out the fifteen flat files named in the output file contract, in
//! binary and (optionally) CSV form, truncating on the first chunk of a
//! run and appending thereafter.
extern crate collar_core;
extern crate collar_in;
#[cfg(test)]
extern crate tempfile;

#[cfg(test)]
mod integration_tests;
mod write_data;
mod writer;

pub use collar_core::CollarError;
pub use writer::OutputSet;
