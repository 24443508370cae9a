//! The record types produced by the segment decoders.
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

use crate::bitconverter::decode_device_time;

/// A device-clock / GPS-clock pair attached to a sample or segment.
///
/// The monotonic triple (`week_num`, `milli_num`, `nano_num`) is always
/// populated by the bit-field decoder. The absolute triple
/// (`gps_week_num`, `gps_milli_num`, `gps_nano_num`) starts zeroed and is
/// only filled in once the back-annotator has applied a GPS offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct GpsTime {
    pub week_num: u32,
    pub milli_num: u32,
    pub nano_num: u32,
    pub gps_week_num: u32,
    pub gps_milli_num: u32,
    pub gps_nano_num: u32,
}

impl GpsTime {
    /// Build a `GpsTime` from a raw 9-byte device time field, leaving the
    /// absolute fields at zero.
    pub fn from_raw_word(raw: u64) -> Self {
        let (week_num, milli_num, nano_num) = decode_device_time(raw);
        Self {
            week_num,
            milli_num,
            nano_num,
            ..Default::default()
        }
    }

    /// The flat field order written by the output writer (6 x u32).
    pub fn as_fields(&self) -> [u32; 6] {
        [
            self.week_num,
            self.milli_num,
            self.nano_num,
            self.gps_week_num,
            self.gps_milli_num,
            self.gps_nano_num,
        ]
    }

    pub const CSV_HEADER: [&'static str; 6] = [
        "week_num",
        "milli_num",
        "nano_num",
        "gps_week_num",
        "gps_milli_num",
        "gps_nano_num",
    ];
}

/// A STATUS segment: a snapshot of the device's health plus the most
/// recent sample time for every stream, as raw (still packed) device-time
/// words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct StatusPacket {
    pub compile: u32,
    pub commit: u32,
    pub status_t: u64,
    pub accel_t: u64,
    pub mag_t: u64,
    pub gyro_t: u64,
    pub temp_t: u64,
    pub audio_t: u64,
    pub rtc_t: u32,
    pub mics_active: u8,
    pub status_type: u8,
}

impl StatusPacket {
    /// The flat field order written by the output writer (11 x u64,
    /// narrower fields widened for a uniform fixed-stride record).
    pub fn as_fields(&self) -> [u64; 11] {
        [
            self.compile as u64,
            self.commit as u64,
            self.status_t,
            self.accel_t,
            self.mag_t,
            self.gyro_t,
            self.temp_t,
            self.audio_t,
            self.rtc_t as u64,
            self.mics_active as u64,
            self.status_type as u64,
        ]
    }

    pub const CSV_HEADER: [&'static str; 11] = [
        "compile",
        "commit",
        "status_t",
        "accel_t",
        "mag_t",
        "gyro_t",
        "temp_t",
        "audio_t",
        "rtc_t",
        "mics_active",
        "status_type",
    ];
}

/// A u-blox NAV-SOL subset, plus the device clock at the time of the fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct NavSolPacket {
    pub itow: u32,
    pub ftow: i32,
    pub weekepoch: i16,
    pub fixtype: u8,
    pub ecefx: i32,
    pub ecefy: i32,
    pub ecefz: i32,
    pub pacc: u32,
    pub posdop: u16,
    pub numsv: u8,
    pub reset_time_week: u32,
    pub reset_time_ms: u32,
    pub reset_time_ns: u32,
}

impl NavSolPacket {
    pub fn as_fields(&self) -> [i64; 13] {
        [
            self.itow as i64,
            self.ftow as i64,
            self.weekepoch as i64,
            self.fixtype as i64,
            self.ecefx as i64,
            self.ecefy as i64,
            self.ecefz as i64,
            self.pacc as i64,
            self.posdop as i64,
            self.numsv as i64,
            self.reset_time_week as i64,
            self.reset_time_ms as i64,
            self.reset_time_ns as i64,
        ]
    }

    pub const CSV_HEADER: [&'static str; 13] = [
        "itow",
        "ftow",
        "weekepoch",
        "fixtype",
        "ecefx",
        "ecefy",
        "ecefz",
        "pacc",
        "posdop",
        "numsv",
        "reset_time_week",
        "reset_time_ms",
        "reset_time_ns",
    ];
}

/// A u-blox TIM-TM2 subset, plus the device clock at the time of the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct TmPacket {
    pub flags: u8,
    pub wn_f: u16,
    pub towms_f: u32,
    pub towsubms_f: u32,
    pub accestns: u32,
    pub reset_time_week: u32,
    pub reset_time_ms: u32,
    pub reset_time_ns: u32,
}

impl TmPacket {
    pub fn as_fields(&self) -> [i64; 8] {
        [
            self.flags as i64,
            self.wn_f as i64,
            self.towms_f as i64,
            self.towsubms_f as i64,
            self.accestns as i64,
            self.reset_time_week as i64,
            self.reset_time_ms as i64,
            self.reset_time_ns as i64,
        ]
    }

    pub const CSV_HEADER: [&'static str; 8] = [
        "flags",
        "wn_f",
        "towms_f",
        "towsubms_f",
        "accestns",
        "reset_time_week",
        "reset_time_ms",
        "reset_time_ns",
    ];
}

/// A GPS time-pulse packet: the device's FPGA-local time paired with the
/// absolute GPS time it corresponds to. The lookup table used to correct
/// device time into GPS time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct TimTpPacket {
    pub reset_time_week: u32,
    pub reset_time_ms: u32,
    pub reset_time_ns: u32,
    pub gps_week: u32,
    pub gps_ms: u32,
    pub gps_ns: u32,
}

impl TimTpPacket {
    pub fn as_fields(&self) -> [u32; 6] {
        [
            self.reset_time_week,
            self.reset_time_ms,
            self.reset_time_ns,
            self.gps_week,
            self.gps_ms,
            self.gps_ns,
        ]
    }

    pub const CSV_HEADER: [&'static str; 6] = [
        "reset_time_week",
        "reset_time_ms",
        "reset_time_ns",
        "gps_week",
        "gps_ms",
        "gps_ns",
    ];
}
