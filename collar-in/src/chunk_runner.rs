//! Drives sequential 128 MiB reads over the input file, invokes the block
//! parser and segment decoders for every 512-byte window, and hands each
//! chunk's fully back-annotated buffers to a caller-supplied sink.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use collar_core::{sample_interval, AUDIO_SAMPLE_RATE_HZ, BLOCK_LEN, CollarError, DecodeConfig, DecodeSummary, GYRO_ACCEL_SAMPLE_RATE_HZ, MAG_SAMPLE_RATE_HZ};

use crate::back_annotate::{apply_gps_offset, fill_device_clock};
use crate::buffers::{ChunkBuffers, RunningState};
use crate::classifier::{classify_block, ClassifiedBlock};
use crate::decoders::{decode_audio, decode_imu, decode_navsol, decode_status, decode_tm2, decode_time_pulse, ImuStream};

/// Called once per chunk, after back-annotation, with that chunk's
/// buffers and whether this is the first chunk of the run (the writer
/// uses this to decide whether to truncate and whether to emit CSV
/// headers).
pub trait ChunkSink {
    fn flush_chunk(&mut self, buffers: &ChunkBuffers, first_chunk: bool) -> Result<(), CollarError>;
}

/// Run a full decode of `config.input_path()`, feeding each processed
/// chunk to `sink`.
pub fn run(config: &DecodeConfig, sink: &mut dyn ChunkSink) -> Result<DecodeSummary, CollarError> {
    let path: &Path = config.input_path();
    let mut file = File::open(path)?;
    let actual_file_size = file.metadata()?.len();
    let file_length = config.resolve_file_length(actual_file_size);

    let gyro_rate = sample_interval(GYRO_ACCEL_SAMPLE_RATE_HZ);
    let accel_rate = gyro_rate;
    let mag_rate = sample_interval(MAG_SAMPLE_RATE_HZ);
    let audio_rate = sample_interval(AUDIO_SAMPLE_RATE_HZ);

    let mut state = RunningState::default();
    let mut summary = DecodeSummary::default();
    let mut buffers = ChunkBuffers::default();
    let mut first_chunk = true;

    let mut file_loc: u64 = 0;
    while file_loc < file_length {
        let read_size = std::cmp::min(config.max_read_bytes() as u64, file_length - file_loc) as usize;
        let mut chunk = vec![0u8; read_size];
        file.read_exact(&mut chunk)?;

        let mut k = 0usize;
        while k + BLOCK_LEN <= chunk.len() {
            let block = &chunk[k..k + BLOCK_LEN];
            match classify_block(block) {
                ClassifiedBlock::Empty => {
                    summary.blocks_empty += 1;
                }
                ClassifiedBlock::Malformed { sequence_number, detail } => {
                    log::warn!("block {} malformed: {}", sequence_number, detail);
                    summary.blocks_malformed += 1;
                }
                ClassifiedBlock::Segments { sequence_number, segments } => {
                    buffers.sequence_number.push(sequence_number);
                    summary.blocks_processed += 1;

                    for seg in &segments {
                        let segment_type = match seg.segment_type {
                            Some(t) => t,
                            None => continue, // unrecognised type, trailer already consumed
                        };
                        if segment_type.is_skip_only() {
                            continue; // trailer consumed, nothing decoded
                        }
                        use collar_core::SegmentType::*;
                        match segment_type {
                            Unused => {}
                            Status => {
                                decode_status(block, seg, &mut buffers, &mut state);
                                summary.status_segments += 1;
                            }
                            GpsPosition => {
                                decode_navsol(block, seg, &mut buffers);
                                summary.navsol_packets += 1;
                            }
                            GpsTimeMark => {
                                decode_tm2(block, seg, &mut buffers);
                                summary.tm_packets += 1;
                            }
                            GpsTimePulse => {
                                decode_time_pulse(block, seg, &mut buffers);
                                summary.tim_tp_packets += 1;
                            }
                            ImuGyro => {
                                decode_imu(block, seg, ImuStream::Gyro, &mut buffers, &mut state);
                                summary.gyro_segments += 1;
                            }
                            ImuAccel => {
                                decode_imu(block, seg, ImuStream::Accel, &mut buffers, &mut state);
                                summary.accel_segments += 1;
                            }
                            ImuMag => {
                                decode_imu(block, seg, ImuStream::Mag, &mut buffers, &mut state);
                                summary.mag_segments += 1;
                            }
                            Audio => {
                                decode_audio(block, seg, config.channel_count(), &mut buffers, &mut state);
                                summary.audio_segments += 1;
                            }
                            ImuTemp | Event => unreachable!("is_skip_only() filters these above"),
                        }
                    }
                }
            }
            k += BLOCK_LEN;
        }

        // Step 1: per-stream device-clock fill.
        fill_device_clock(&mut buffers.gyro_time, &buffers.g_packets_num, gyro_rate.0, gyro_rate.1);
        fill_device_clock(&mut buffers.accel_time, &buffers.xl_packets_num, accel_rate.0, accel_rate.1);
        fill_device_clock(&mut buffers.mag_time, &buffers.mag_packets_num, mag_rate.0, mag_rate.1);
        fill_device_clock(&mut buffers.audio_time, &buffers.aud_packets_num, audio_rate.0, audio_rate.1);

        // Step 2: GPS offset application.
        apply_gps_offset(&mut buffers.gyro_time, &buffers.tim_tp_packets);
        apply_gps_offset(&mut buffers.accel_time, &buffers.tim_tp_packets);
        apply_gps_offset(&mut buffers.mag_time, &buffers.tim_tp_packets);
        apply_gps_offset(&mut buffers.audio_time, &buffers.tim_tp_packets);

        sink.flush_chunk(&buffers, first_chunk)?;

        buffers.clear();
        state.reset_segment_counters();
        first_chunk = false;
        file_loc += read_size as u64;
    }

    Ok(summary)
}
