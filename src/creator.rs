//! Synthesis of the `file_creator` definition and data pair.
//!
//! Garmin Connect expects activities to name the firmware that wrote them.
//! When a rewritten document lacks a `file_creator` message, a fixed
//! definition and data pair is spliced in ahead of the trailer.

use alloc::vec::Vec;

use crate::header;
use crate::scan::FILE_CREATOR;

/// Software version carried by the synthesized record.
pub const SOFTWARE_VERSION: u16 = 975;
/// Hardware version carried by the synthesized record.
pub const HARDWARE_VERSION: u8 = 255;

/// Local message slot claimed by the synthesized pair.
const LOCAL_MESSAGE: u8 = 7;

/// Wire image of the synthesized definition and data records.
pub fn block() -> [u8; 16] {
    let [global_lo, global_hi] = FILE_CREATOR.to_le_bytes();
    let [software_lo, software_hi] = SOFTWARE_VERSION.to_le_bytes();

    [
        0x40 | LOCAL_MESSAGE, // definition record header
        0x00,                 // reserved
        0x00,                 // little-endian architecture
        global_lo,
        global_hi,
        0x02,             // field count
        0x00, 0x02, 0x84, // software_version, uint16
        0x01, 0x01, 0x02, // hardware_version, uint8
        LOCAL_MESSAGE, // data record header
        software_lo,
        software_hi,
        HARDWARE_VERSION,
    ]
}

/// Splice the synthesized pair in ahead of the trailer, growing the payload
/// size declared in the header to match.
pub fn splice(data: &mut Vec<u8>) {
    let at = data.len() - 2;
    let block = block();

    data.splice(at..at, block);
    header::grow_payload(data, block.len() as u32);
}
