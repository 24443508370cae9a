//! One decoder per segment kind. Each takes the owning block's bytes and
//! the classified segment, and writes into the chunk's buffers.
use std::convert::TryInto;

use collar_core::{
    GpsTime, NavSolPacket, StatusPacket, TimTpPacket, TmPacket,
    bitconverter::read_device_time_field,
};

use crate::buffers::{ChunkBuffers, RunningState};
use crate::classifier::RawSegment;

fn time_field(block: &[u8], start: usize, field_offset: usize) -> [u8; 9] {
    block[start + field_offset..start + field_offset + 9]
        .try_into()
        .expect("9-byte device time field")
}

fn u32_at(block: &[u8], start: usize, offset: usize) -> u32 {
    u32::from_le_bytes(block[start + offset..start + offset + 4].try_into().unwrap())
}

fn i32_at(block: &[u8], start: usize, offset: usize) -> i32 {
    i32::from_le_bytes(block[start + offset..start + offset + 4].try_into().unwrap())
}

fn u16_at(block: &[u8], start: usize, offset: usize) -> u16 {
    u16::from_le_bytes(block[start + offset..start + offset + 2].try_into().unwrap())
}

fn i16_at(block: &[u8], start: usize, offset: usize) -> i32 {
    i16::from_le_bytes(block[start + offset..start + offset + 2].try_into().unwrap()) as i32
}

mod status_offsets {
    pub const COMPILE: usize = 0;
    pub const COMMIT: usize = 4;
    pub const STATUS_T: usize = 8;
    pub const ACCEL_T: usize = 17;
    pub const MAG_T: usize = 26;
    pub const GYRO_T: usize = 35;
    pub const TEMP_T: usize = 44;
    pub const AUDIO_T: usize = 53;
    pub const RTC_T: usize = 62;
    pub const MICS_ACTIVE: usize = 66;
    pub const STATUS_TYPE: usize = 67;
}

mod navsol_offsets {
    pub const ITOW: usize = 0;
    pub const FTOW: usize = 4;
    pub const WEEKEPOCH: usize = 8;
    pub const FIXTYPE: usize = 10;
    pub const ECEFX: usize = 11;
    pub const ECEFY: usize = 15;
    pub const ECEFZ: usize = 19;
    pub const PACC: usize = 23;
    pub const POSDOP: usize = 27;
    pub const NUMSV: usize = 29;
    pub const POSTTIME: usize = 30;
}

mod tm2_offsets {
    pub const FLAGS: usize = 0;
    pub const WN_F: usize = 1;
    pub const TOWMS_F: usize = 3;
    pub const TOWSUBMS_F: usize = 7;
    pub const ACCESTNS: usize = 11;
    pub const MARKTIME: usize = 15;
}

mod tp_offsets {
    pub const FPGA_TIME: usize = 0;
    pub const TIMEPULSE: usize = 9;
}

/// STATUS: the device's health snapshot, plus the most recent sample time
/// for every stream. Updates the running time anchors and snapshots the
/// per-stream segment counters as back-annotation partition boundaries.
pub fn decode_status(block: &[u8], seg: &RawSegment, buffers: &mut ChunkBuffers, state: &mut RunningState) {
    use status_offsets::*;
    let start = seg.start;

    let status_t_raw = raw_word(block, start, STATUS_T);
    let accel_t_raw = raw_word(block, start, ACCEL_T);
    let mag_t_raw = raw_word(block, start, MAG_T);
    let gyro_t_raw = raw_word(block, start, GYRO_T);
    let temp_t_raw = raw_word(block, start, TEMP_T);
    let audio_t_raw = raw_word(block, start, AUDIO_T);

    let packet = StatusPacket {
        compile: u32_at(block, start, COMPILE),
        commit: u32_at(block, start, COMMIT),
        status_t: status_t_raw,
        accel_t: accel_t_raw,
        mag_t: mag_t_raw,
        gyro_t: gyro_t_raw,
        temp_t: temp_t_raw,
        audio_t: audio_t_raw,
        rtc_t: u32_at(block, start, RTC_T),
        mics_active: block[start + MICS_ACTIVE],
        status_type: block[start + STATUS_TYPE],
    };

    state.recent_gyro_time = gyro_t_raw;
    state.recent_accel_time = accel_t_raw;
    state.recent_mag_time = mag_t_raw;
    state.recent_audio_time = audio_t_raw;

    buffers.status_p_time_mark.push(GpsTime::from_raw_word(status_t_raw));
    buffers.gyro_time_mark.push(GpsTime::from_raw_word(gyro_t_raw));
    buffers.accel_time_mark.push(GpsTime::from_raw_word(accel_t_raw));
    buffers.mag_time_mark.push(GpsTime::from_raw_word(mag_t_raw));
    buffers.audio_time_mark.push(GpsTime::from_raw_word(audio_t_raw));

    buffers.xl_packets_num.push(state.xl_packets);
    buffers.mag_packets_num.push(state.mag_packets);
    buffers.g_packets_num.push(state.g_packets);
    buffers.aud_packets_num.push(state.aud_packets);

    buffers.status_packets.push(packet);
}

fn raw_word(block: &[u8], start: usize, field_offset: usize) -> u64 {
    let field = time_field(block, start, field_offset);
    u64::from_le_bytes(field[..8].try_into().expect("field is 9 bytes"))
}

/// GPS_POSITION (NAV-SOL): a u-blox fix subset, plus the device clock at
/// the time of the fix.
pub fn decode_navsol(block: &[u8], seg: &RawSegment, buffers: &mut ChunkBuffers) {
    use navsol_offsets::*;
    let start = seg.start;
    let field = time_field(block, start, POSTTIME);
    let (week, ms, ns) = read_device_time_field(&field);

    buffers.navsol_packets.push(NavSolPacket {
        itow: u32_at(block, start, ITOW),
        ftow: i32_at(block, start, FTOW),
        weekepoch: u16_at(block, start, WEEKEPOCH) as i16,
        fixtype: block[start + FIXTYPE],
        ecefx: i32_at(block, start, ECEFX),
        ecefy: i32_at(block, start, ECEFY),
        ecefz: i32_at(block, start, ECEFZ),
        pacc: u32_at(block, start, PACC),
        posdop: u16_at(block, start, POSDOP),
        numsv: block[start + NUMSV],
        reset_time_week: week,
        reset_time_ms: ms,
        reset_time_ns: ns,
    });
}

/// GPS_TIME_MARK (TM2): a u-blox TIM-TM2 subset, plus the device clock at
/// the time of the mark.
pub fn decode_tm2(block: &[u8], seg: &RawSegment, buffers: &mut ChunkBuffers) {
    use tm2_offsets::*;
    let start = seg.start;
    let field = time_field(block, start, MARKTIME);
    let (week, ms, ns) = read_device_time_field(&field);

    buffers.tm_packets.push(TmPacket {
        flags: block[start + FLAGS],
        wn_f: u16_at(block, start, WN_F),
        towms_f: u32_at(block, start, TOWMS_F),
        towsubms_f: u32_at(block, start, TOWSUBMS_F),
        accestns: u32_at(block, start, ACCESTNS),
        reset_time_week: week,
        reset_time_ms: ms,
        reset_time_ns: ns,
    });
}

/// GPS_TIME_PULSE: two device-time words back to back. The first is the
/// FPGA-local time, the second the absolute GPS time at the pulse.
pub fn decode_time_pulse(block: &[u8], seg: &RawSegment, buffers: &mut ChunkBuffers) {
    use tp_offsets::*;
    let start = seg.start;

    let fpga_field = time_field(block, start, FPGA_TIME);
    let (reset_time_week, reset_time_ms, reset_time_ns) = read_device_time_field(&fpga_field);

    let gps_field = time_field(block, start, TIMEPULSE);
    let (gps_week, gps_ms, gps_ns) = read_device_time_field(&gps_field);

    buffers.tim_tp_packets.push(TimTpPacket {
        reset_time_week,
        reset_time_ms,
        reset_time_ns,
        gps_week,
        gps_ms,
        gps_ns,
    });
}

/// One of the three IMU streams: Z, Y, X int16-LE samples, interleaved.
/// Each segment contributes one anchor timestamp (not one per sample).
pub enum ImuStream {
    Gyro,
    Accel,
    Mag,
}

pub fn decode_imu(block: &[u8], seg: &RawSegment, stream: ImuStream, buffers: &mut ChunkBuffers, state: &mut RunningState) {
    let start = seg.start;
    let mut offset = 0usize;
    let out = match stream {
        ImuStream::Gyro => &mut buffers.gyro_segment_stream,
        ImuStream::Accel => &mut buffers.accel_segment_stream,
        ImuStream::Mag => &mut buffers.mag_segment_stream,
    };
    while offset < seg.length {
        out.push(i16_at(block, start, offset));
        offset += 2;
    }

    match stream {
        ImuStream::Gyro => {
            buffers.gyro_time.push(GpsTime::from_raw_word(state.recent_gyro_time));
            state.g_packets += 1;
        }
        ImuStream::Accel => {
            buffers.accel_time.push(GpsTime::from_raw_word(state.recent_accel_time));
            state.xl_packets += 1;
        }
        ImuStream::Mag => {
            buffers.mag_time.push(GpsTime::from_raw_word(state.recent_mag_time));
            state.mag_packets += 1;
        }
    }
}

/// AUDIO: interleaved stereo (or wider) int16-LE samples. Two passes over
/// the payload produce the right and left channels; only the right-channel
/// pass advances the per-sample timestamp and segment counter, matching
/// the device's own bookkeeping.
pub fn decode_audio(block: &[u8], seg: &RawSegment, channel_count: u8, buffers: &mut ChunkBuffers, state: &mut RunningState) {
    let start = seg.start;
    let stride = 2usize * channel_count as usize;
    debug_assert_eq!(seg.length % stride, 0, "audio payload must be a multiple of the channel stride");

    let mut offset = 0usize;
    while offset < seg.length {
        buffers.audio_r.push(i16_at(block, start, offset));
        state.aud_packets += 1;
        buffers.audio_time.push(GpsTime::from_raw_word(state.recent_audio_time));
        offset += stride;
    }

    let mut offset = 2usize;
    while offset < seg.length {
        buffers.audio_l.push(i16_at(block, start, offset));
        offset += stride;
    }
}
