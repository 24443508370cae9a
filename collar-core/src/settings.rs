//! This module contains the [`DecodeConfig`] structure used to configure a
//! single decode run, and the [`DecodeSummary`] report produced at its end.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::CollarError;

/// 128 MiB, the chunk runner's sequential read size.
pub const MAX_READ_BYTES: usize = 128 * 1024 * 1024;

/// The number of interleaved audio channels the AUDIO decoder assumes.
/// See the crate-level docs for why this is configurable rather than a
/// literal constant.
pub const DEFAULT_CHANNEL_COUNT: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
/// Resolved configuration for one decode run.
///
/// This structure does not allow direct manipulation of fields because
/// `num_blocks` and `file_length` interact (the former caps the latter);
/// use [`DecodeConfig::whole_file`] / [`DecodeConfig::block_limited`] and
/// the getters below instead.
pub struct DecodeConfig {
    pub(crate) input_path: PathBuf,
    pub(crate) num_blocks: Option<u64>,
    pub(crate) emit_csv: bool,
    pub(crate) max_read_bytes: usize,
    pub(crate) channel_count: u8,
    pub(crate) output_dir: PathBuf,
}

impl DecodeConfig {
    /// Decode the entire file, binary output only (the 1-argument CLI form).
    /// ```
    /// use collar_core::settings::DecodeConfig;
    /// let cfg = DecodeConfig::whole_file("recording.bin");
    /// assert_eq!(cfg.num_blocks(), None);
    /// assert!(!cfg.emit_csv());
    /// ```
    pub fn whole_file<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            num_blocks: None,
            emit_csv: false,
            max_read_bytes: MAX_READ_BYTES,
            channel_count: DEFAULT_CHANNEL_COUNT,
            output_dir: PathBuf::from("."),
        }
    }

    /// Decode the first `num_blocks * 512` bytes (capped at file size),
    /// the 3-argument CLI form.
    /// ```
    /// use collar_core::settings::DecodeConfig;
    /// let cfg = DecodeConfig::block_limited("recording.bin", 10, true);
    /// assert_eq!(cfg.num_blocks(), Some(10));
    /// assert!(cfg.emit_csv());
    /// ```
    pub fn block_limited<P: Into<PathBuf>>(input_path: P, num_blocks: u64, emit_csv: bool) -> Self {
        Self {
            input_path: input_path.into(),
            num_blocks: Some(num_blocks),
            emit_csv,
            max_read_bytes: MAX_READ_BYTES,
            channel_count: DEFAULT_CHANNEL_COUNT,
            output_dir: PathBuf::from("."),
        }
    }

    /// Parse the process's `argv` (excluding the program name) into a
    /// [`DecodeConfig`], per the CLI contract: 1 positional argument means
    /// "decode the whole file"; 3 means `<filename> <num_blocks> <csv_flag>`;
    /// any other arity is an error.
    pub fn from_args(args: &[String]) -> Result<Self, CollarError> {
        match args {
            [filename] => Ok(Self::whole_file(filename.clone())),
            [filename, num_blocks, csv_flag] => {
                let num_blocks: u64 = num_blocks.parse().map_err(|_| CollarError::InvalidBlockCount {
                    requested: num_blocks.clone(),
                })?;
                let csv_flag: u8 = csv_flag.parse().map_err(|_| CollarError::InvalidBlockCount {
                    requested: csv_flag.clone(),
                })?;
                Ok(Self::block_limited(filename.clone(), num_blocks, csv_flag != 0))
            }
            other => Err(CollarError::InvalidArgCount { got: other.len() }),
        }
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_channel_count(mut self, channel_count: u8) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn with_max_read_bytes(mut self, max_read_bytes: usize) -> Self {
        self.max_read_bytes = max_read_bytes;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn num_blocks(&self) -> Option<u64> {
        self.num_blocks
    }

    pub fn emit_csv(&self) -> bool {
        self.emit_csv
    }

    pub fn max_read_bytes(&self) -> usize {
        self.max_read_bytes
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve the number of bytes to decode, clamping a requested block
    /// count at the real file size.
    pub fn resolve_file_length(&self, actual_file_size: u64) -> u64 {
        match self.num_blocks {
            None => actual_file_size,
            Some(n) => {
                let requested = n.saturating_mul(512);
                if requested > actual_file_size {
                    log::warn!(
                        "requested {} blocks ({} bytes) exceeds file size {} bytes; clamping",
                        n,
                        requested,
                        actual_file_size
                    );
                    actual_file_size
                } else {
                    requested
                }
            }
        }
    }
}

/// The end-of-run report: what the chunk runner processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub blocks_processed: u64,
    pub blocks_empty: u64,
    pub blocks_malformed: u64,
    pub status_segments: u64,
    pub gyro_segments: u64,
    pub accel_segments: u64,
    pub mag_segments: u64,
    pub audio_segments: u64,
    pub navsol_packets: u64,
    pub tm_packets: u64,
    pub tim_tp_packets: u64,
}

impl DecodeSummary {
    pub fn log_elapsed(&self, elapsed: Duration) {
        log::info!(
            "decoded {} blocks ({} empty, {} malformed) in {:.3}s",
            self.blocks_processed,
            self.blocks_empty,
            self.blocks_malformed,
            elapsed.as_secs_f64()
        );
    }
}
