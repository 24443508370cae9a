//! Streaming decoder for collar sensor recordings: classifies blocks into
//! segments, decodes each segment kind, and back-annotates per-sample
//! timestamps, independently of how the result is written out (see
//! `collar-out`).
pub mod back_annotate;
pub mod buffers;
pub mod chunk_runner;
pub mod classifier;
pub mod decoders;

pub use buffers::{ChunkBuffers, RunningState};
pub use chunk_runner::{run, ChunkSink};
pub use classifier::{classify_block, ClassifiedBlock, RawSegment};
