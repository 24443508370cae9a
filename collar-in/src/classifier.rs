//! The block-and-segment parser: turns one 512-byte block into an ordered
//! list of segments by reverse-scanning its trailers.
use std::convert::TryInto;

use collar_core::segment_type::SegmentType;
use collar_core::{BLOCK_LEN, BLOCK_SEQNO_LEN};

/// One segment recovered from a block, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment {
    pub type_byte: u8,
    pub segment_type: Option<SegmentType>,
    /// Offset of the first payload byte, relative to the start of the block.
    pub start: usize,
    /// Offset of the last payload byte (inclusive), relative to the block.
    pub end: usize,
    pub length: usize,
}

/// The outcome of classifying one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedBlock {
    /// Sequence number 0: no valid segments.
    Empty,
    /// A declared trailer length would carry the cursor below byte 4.
    Malformed { sequence_number: u32, detail: String },
    /// Segments in file order (start ascending).
    Segments {
        sequence_number: u32,
        segments: Vec<RawSegment>,
    },
}

/// Classify one 512-byte block.
///
/// Mirrors the reverse scan the device itself uses to finalise blocks: a
/// cursor starts at the last byte and walks toward the 4-byte sequence
/// number, reading each segment's trailing `{type, length}` pair. The
/// segments are collected tail-first and reversed once before returning
/// so callers can simply iterate them in file order.
pub fn classify_block(block: &[u8]) -> ClassifiedBlock {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let sequence_number = u32::from_le_bytes(
        block[0..BLOCK_SEQNO_LEN]
            .try_into()
            .expect("block is BLOCK_LEN bytes"),
    );
    if sequence_number == 0 {
        return ClassifiedBlock::Empty;
    }

    let mut segments = Vec::new();
    let mut cursor = BLOCK_LEN - 1;
    let stop_at = BLOCK_SEQNO_LEN - 1;

    while cursor != stop_at {
        let length = block[cursor] as usize;
        let type_byte = block[cursor - 1];

        if type_byte == SegmentType::Unused as u8 {
            // Skip padding: consume `length` payload bytes plus the trailer.
            if cursor < length + 2 {
                return ClassifiedBlock::Malformed {
                    sequence_number,
                    detail: format!(
                        "padding of length {} at cursor {} would cross the sequence number",
                        length, cursor
                    ),
                };
            }
            cursor -= length + 2;
            continue;
        }

        if cursor < length + 1 || cursor - 1 - length < BLOCK_SEQNO_LEN {
            return ClassifiedBlock::Malformed {
                sequence_number,
                detail: format!(
                    "segment of length {} ending at cursor {} would start before byte {}",
                    length, cursor, BLOCK_SEQNO_LEN
                ),
            };
        }

        let end = cursor - 2;
        let start = cursor - 1 - length;
        segments.push(RawSegment {
            type_byte,
            segment_type: SegmentType::from_byte(type_byte),
            start,
            end,
            length,
        });
        cursor = start - 1;
    }

    segments.reverse();
    ClassifiedBlock::Segments {
        sequence_number,
        segments,
    }
}
