//! The segment type byte that terminates every trailer in a block.
//!
//! Each segment packed into a block ends with a two-byte trailer
//! `[type, length]`. The type values below are the ones the FPGA is known
//! to emit; unrecognised codes are tolerated by the classifier (the
//! trailer is still consumed) but produce no decoded record.
use num::FromPrimitive;
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum SegmentType {
    Unused = 0x01,
    Status = 0x02,
    GpsTimeMark = 0x03,
    GpsPosition = 0x04,
    ImuGyro = 0x05,
    ImuAccel = 0x06,
    ImuMag = 0x07,
    Audio = 0x08,
    ImuTemp = 0x0A,
    Event = 0x0B,
    GpsTimePulse = 0x0D,
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl SegmentType {
    /// Recognise a trailer type byte. Unknown bytes are not an error —
    /// callers that need to skip unrecognised segments should match on
    /// `None` rather than propagate a `CollarError`.
    pub fn from_byte(source: u8) -> Option<Self> {
        SegmentType::from_u8(source)
    }

    /// Whether this segment carries no decodable payload even when it is
    /// encountered — its trailer still has to be consumed so the cursor
    /// advances correctly.
    pub fn is_skip_only(self) -> bool {
        matches!(self, Self::ImuTemp | Self::Event)
    }
}
