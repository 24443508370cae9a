//! The per-chunk accumulators and the state that must survive between
//! chunks.
use collar_core::{GpsTime, NavSolPacket, StatusPacket, TimTpPacket, TmPacket};

/// Everything decoded out of one chunk, ready for back-annotation and
/// output. Created empty at the top of a chunk, cleared at the end.
#[derive(Debug, Default)]
pub struct ChunkBuffers {
    pub sequence_number: Vec<u32>,

    pub audio_l: Vec<i32>,
    pub audio_r: Vec<i32>,
    pub gyro_segment_stream: Vec<i32>,
    pub accel_segment_stream: Vec<i32>,
    pub mag_segment_stream: Vec<i32>,

    pub gyro_time: Vec<GpsTime>,
    pub accel_time: Vec<GpsTime>,
    pub mag_time: Vec<GpsTime>,
    pub audio_time: Vec<GpsTime>,

    pub status_p_time_mark: Vec<GpsTime>,
    pub gyro_time_mark: Vec<GpsTime>,
    pub accel_time_mark: Vec<GpsTime>,
    pub mag_time_mark: Vec<GpsTime>,
    pub audio_time_mark: Vec<GpsTime>,

    pub status_packets: Vec<StatusPacket>,
    pub navsol_packets: Vec<NavSolPacket>,
    pub tm_packets: Vec<TmPacket>,
    pub tim_tp_packets: Vec<TimTpPacket>,

    /// Cumulative gyro/accel segment count snapshotted at each STATUS.
    pub xl_packets_num: Vec<i32>,
    pub mag_packets_num: Vec<i32>,
    pub g_packets_num: Vec<i32>,
    pub aud_packets_num: Vec<i32>,
}

impl ChunkBuffers {
    pub fn clear(&mut self) {
        *self = ChunkBuffers::default();
    }
}

/// State that the source keeps alive for the whole file: the most recent
/// STATUS-reported sample time per stream, plus the running per-stream
/// segment counters. The counters are reset to -1 at the end of every
/// chunk (they only make sense relative to that chunk's own
/// `*_packets_num` snapshots); the time anchors are not reset.
#[derive(Debug, Clone, Copy)]
pub struct RunningState {
    pub recent_gyro_time: u64,
    pub recent_accel_time: u64,
    pub recent_mag_time: u64,
    pub recent_audio_time: u64,

    pub xl_packets: i32,
    pub mag_packets: i32,
    pub g_packets: i32,
    pub aud_packets: i32,
}

impl Default for RunningState {
    fn default() -> Self {
        Self {
            recent_gyro_time: 0,
            recent_accel_time: 0,
            recent_mag_time: 0,
            recent_audio_time: 0,
            xl_packets: -1,
            mag_packets: -1,
            g_packets: -1,
            aud_packets: -1,
        }
    }
}

impl RunningState {
    /// Reset only the per-stream segment counters, as happens at the end
    /// of every chunk. The time anchors survive untouched.
    pub fn reset_segment_counters(&mut self) {
        self.xl_packets = -1;
        self.mag_packets = -1;
        self.g_packets = -1;
        self.aud_packets = -1;
    }
}
