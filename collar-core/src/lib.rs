//! This library is the foundation for the `collar-in` and `collar-out` crates. It can be built
//! either with serialization support, or in a slightly more lightweight manner without it (see
//! features).
#![allow(clippy::derive_partial_eq_without_eq)]
extern crate num;
#[macro_use]
extern crate num_derive;

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod bitconverter;
pub mod errors;
pub mod model;
pub mod segment_type;
pub mod settings;

pub use errors::CollarError;
pub use model::*;
pub use segment_type::SegmentType;
pub use settings::{DecodeConfig, DecodeSummary};

/// Fixed size of one block on removable storage.
pub const BLOCK_LEN: usize = 512;
/// Length of the leading little-endian block sequence number.
pub const BLOCK_SEQNO_LEN: usize = 4;
/// Length of a STATUS segment's payload: 11 fixed fields, the last five
/// of which are 9-byte device time words.
pub const STATUS_PAYLOAD_LEN: usize = 68;
/// Length of a GPS_POSITION (NAV-SOL) segment's payload (the trailing 9
/// bytes of this span are the device time field).
pub const NAVSOL_PAYLOAD_LEN: usize = 39;
/// Length of a GPS_TIME_MARK (TM2) segment's payload.
pub const TM2_PAYLOAD_LEN: usize = 24;
/// Length of a GPS_TIME_PULSE segment's payload: two 9-byte time words.
pub const TIME_PULSE_PAYLOAD_LEN: usize = 18;
/// Width in bytes of one device time field.
pub const DEVICE_TIME_FIELD_LEN: usize = 9;

/// Nominal sample rates (Hz) for the streams the back-annotator fills in.
pub const GYRO_ACCEL_SAMPLE_RATE_HZ: f64 = 952.0;
pub const MAG_SAMPLE_RATE_HZ: f64 = 80.0;
pub const AUDIO_SAMPLE_RATE_HZ: f64 = 56_250.0;

/// A nominal sample interval split into whole milliseconds and the
/// remaining nanoseconds-within-a-millisecond, as consumed by the
/// back-annotator's subtraction loop.
/// ```
/// use collar_core::sample_interval;
/// let (ms, ns) = sample_interval(1000.0);
/// assert_eq!((ms, ns), (1, 0));
/// ```
pub fn sample_interval(rate_hz: f64) -> (u32, u32) {
    let total_ns = (1.0e9 / rate_hz).floor() as u64;
    ((total_ns / 1_000_000) as u32, (total_ns % 1_000_000) as u32)
}
