//! [`OutputSet`]: the [`collar_in::ChunkSink`] implementation that lays out
//! a decoded run as the fifteen flat output files named in the output file
//! contract, in binary and (optionally) CSV form.
use std::path::{Path, PathBuf};

use collar_core::{CollarError, GpsTime, NavSolPacket, StatusPacket, TimTpPacket, TmPacket};
use collar_in::{ChunkBuffers, ChunkSink};

use crate::write_data::*;

/// Where a run's output files land, and whether CSV mirrors of the binary
/// files are produced alongside them.
pub struct OutputSet {
    output_dir: PathBuf,
    csv_enabled: bool,
}

impl OutputSet {
    pub fn new<P: AsRef<Path>>(output_dir: P, csv_enabled: bool) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            csv_enabled,
        }
    }

    fn path(&self, file_stem: &str, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", file_stem, ext))
    }

    fn write_scalar_i32(&self, stem: &str, values: &[i32], first_chunk: bool) -> Result<(), CollarError> {
        let bin = self.path(stem, "bin");
        append_scalar_binary_i32(&bin, values, first_chunk).map_err(|source| write_err(bin, source))?;
        if self.csv_enabled {
            let csv = self.path(stem, "csv");
            append_scalar_csv_i32(&csv, values, first_chunk).map_err(|source| write_err(csv, source))?;
        }
        Ok(())
    }

    fn write_scalar_u32(&self, stem: &str, values: &[u32], first_chunk: bool) -> Result<(), CollarError> {
        let bin = self.path(stem, "bin");
        append_scalar_binary_u32(&bin, values, first_chunk).map_err(|source| write_err(bin, source))?;
        if self.csv_enabled {
            let csv = self.path(stem, "csv");
            append_scalar_csv_u32(&csv, values, first_chunk).map_err(|source| write_err(csv, source))?;
        }
        Ok(())
    }

    fn write_gps_times(&self, stem: &str, times: &[GpsTime], first_chunk: bool) -> Result<(), CollarError> {
        let rows: Vec<[u32; 6]> = times.iter().map(GpsTime::as_fields).collect();
        let bin = self.path(stem, "bin");
        append_record_binary_u32(&bin, &rows, first_chunk).map_err(|source| write_err(bin, source))?;
        if self.csv_enabled {
            let csv = self.path(stem, "csv");
            append_record_csv_u32(&csv, &GpsTime::CSV_HEADER, &rows, first_chunk).map_err(|source| write_err(csv, source))?;
        }
        Ok(())
    }
}

fn write_err(path: PathBuf, source: std::io::Error) -> CollarError {
    CollarError::OutputWrite { path, source }
}

impl ChunkSink for OutputSet {
    fn flush_chunk(&mut self, buffers: &ChunkBuffers, first_chunk: bool) -> Result<(), CollarError> {
        self.write_scalar_i32("audio_l", &buffers.audio_l, first_chunk)?;
        self.write_scalar_i32("audio_r", &buffers.audio_r, first_chunk)?;
        self.write_scalar_i32("gyro_stream", &buffers.gyro_segment_stream, first_chunk)?;
        self.write_scalar_i32("accel_stream", &buffers.accel_segment_stream, first_chunk)?;
        self.write_scalar_i32("mag_stream", &buffers.mag_segment_stream, first_chunk)?;
        self.write_scalar_u32("segment_number", &buffers.sequence_number, first_chunk)?;

        let status_rows: Vec<[u64; 11]> = buffers.status_packets.iter().map(StatusPacket::as_fields).collect();
        let status_bin = self.path("status_packets", "bin");
        append_record_binary_u64(&status_bin, &status_rows, first_chunk).map_err(|source| write_err(status_bin, source))?;
        if self.csv_enabled {
            let csv = self.path("status_packets", "csv");
            append_record_csv_u64(&csv, &StatusPacket::CSV_HEADER, &status_rows, first_chunk).map_err(|source| write_err(csv, source))?;
        }

        let navsol_rows: Vec<[i64; 13]> = buffers.navsol_packets.iter().map(NavSolPacket::as_fields).collect();
        let navsol_bin = self.path("navsol_packets", "bin");
        append_record_binary_i32_widened(&navsol_bin, &navsol_rows, first_chunk).map_err(|source| write_err(navsol_bin, source))?;
        if self.csv_enabled {
            let csv = self.path("navsol_packets", "csv");
            append_record_csv_i64(&csv, &NavSolPacket::CSV_HEADER, &navsol_rows, first_chunk).map_err(|source| write_err(csv, source))?;
        }

        let tm_rows: Vec<[i64; 8]> = buffers.tm_packets.iter().map(TmPacket::as_fields).collect();
        let tm_bin = self.path("tm_packets", "bin");
        append_record_binary_i32_widened(&tm_bin, &tm_rows, first_chunk).map_err(|source| write_err(tm_bin, source))?;
        if self.csv_enabled {
            let csv = self.path("tm_packets", "csv");
            append_record_csv_i64(&csv, &TmPacket::CSV_HEADER, &tm_rows, first_chunk).map_err(|source| write_err(csv, source))?;
        }

        let tp_rows: Vec<[u32; 6]> = buffers.tim_tp_packets.iter().map(TimTpPacket::as_fields).collect();
        let tp_bin = self.path("tim_tp_packets", "bin");
        append_record_binary_u32(&tp_bin, &tp_rows, first_chunk).map_err(|source| write_err(tp_bin, source))?;
        if self.csv_enabled {
            let csv = self.path("tim_tp_packets", "csv");
            append_record_csv_u32(&csv, &TimTpPacket::CSV_HEADER, &tp_rows, first_chunk).map_err(|source| write_err(csv, source))?;
        }

        self.write_gps_times("gyro_times", &buffers.gyro_time, first_chunk)?;
        self.write_gps_times("xl_times", &buffers.accel_time, first_chunk)?;
        self.write_gps_times("mag_times", &buffers.mag_time, first_chunk)?;
        self.write_gps_times("audio_times", &buffers.audio_time, first_chunk)?;
        self.write_gps_times("status_p_time_mark", &buffers.status_p_time_mark, first_chunk)?;

        log::debug!(
            "flushed chunk (first_chunk={}): {} blocks, {} audio samples",
            first_chunk,
            buffers.sequence_number.len(),
            buffers.audio_r.len()
        );

        Ok(())
    }
}
