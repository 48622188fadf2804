//! Cyclic redundancy checks over the document trailer.

/// Nibble lookup table for the FIT CRC-16 variant.
const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Accumulate a slice of bytes into a cyclic redundancy check value.
///
/// Each byte contributes two four-bit steps, low nibble first.
pub fn accumulate(init: u16, r: &[u8]) -> u16 {
    r.iter().fold(init, |crc, b| {
        let crc = step(crc, *b);
        step(crc, *b >> 4)
    })
}

fn step(crc: u16, nibble: u8) -> u16 {
    let tmp = CRC_TABLE[(crc & 0xF) as usize];
    ((crc >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[(nibble & 0xF) as usize]
}

/// Recompute the check over everything but the trailer and write it back.
///
/// Returns the value written, little-endian, into the final two bytes.
pub fn seal(data: &mut [u8]) -> u16 {
    let at = data.len() - 2;
    let crc = accumulate(0, &data[..at]);
    data[at..].copy_from_slice(&crc.to_le_bytes());

    crc
}
