//! In-place rewrites of identity fields.
//!
//! Fields are addressed by their cumulative offset within the record: a
//! field's position depends only on the sizes of fields declared before it in
//! the same definition. Every write is bounds-checked against the document,
//! and no write ever resizes it.

use alloc::vec::Vec;

use crate::report::Event;
use crate::scan::{DEVICE_INFO, FILE_ID, MessageDefinition};

/// Manufacturer identifier written into every patched record (Garmin).
pub const MANUFACTURER: u16 = 1;
/// Product identifier written into every patched record (Edge 830).
pub const PRODUCT: u16 = 3122;
/// File type written into `file_id` records (activity).
pub const FILE_TYPE: u8 = 4;

/// Rewrite the identity fields of a data record, if it carries any.
///
/// Returns whether a manufacturer field was overwritten. Records of message
/// kinds other than `file_id` and `device_info` are skipped untouched.
pub fn apply(
    data: &mut [u8],
    at: usize,
    definition: &MessageDefinition,
    events: &mut Vec<Event>,
) -> bool {
    match definition.global_message {
        FILE_ID => patch_file_id(data, at, definition, events),
        DEVICE_INFO => patch_device_info(data, at, definition, events),
        _ => false,
    }
}

fn patch_file_id(
    data: &mut [u8],
    at: usize,
    definition: &MessageDefinition,
    events: &mut Vec<Event>,
) -> bool {
    let mut changed = false;
    let mut offset = at;

    for field in &definition.fields {
        let size = field.size as usize;
        if offset + size > data.len() {
            break;
        }

        match (field.number, field.size) {
            (0, 1) => {
                let from = data[offset];
                data[offset] = FILE_TYPE;
                events.push(Event::FileTypeForced { from });
            }
            (1, 2) => {
                let from = write_u16(data, offset, MANUFACTURER);
                events.push(Event::ManufacturerForced {
                    message: FILE_ID,
                    from,
                });
                changed = true;
            }
            (2, 2) => {
                let from = write_u16(data, offset, PRODUCT);
                events.push(Event::ProductForced {
                    message: FILE_ID,
                    from,
                });
            }
            (4, 4) => {
                // Creation time is recorded but never modified.
                let seconds = u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap());
                events.push(Event::TimeCreated { seconds });
            }
            _ => {}
        }

        offset += size;
    }

    changed
}

fn patch_device_info(
    data: &mut [u8],
    at: usize,
    definition: &MessageDefinition,
    events: &mut Vec<Event>,
) -> bool {
    let mut changed = false;
    let mut offset = at;

    for field in &definition.fields {
        let size = field.size as usize;
        if offset + size > data.len() {
            break;
        }

        match (field.number, field.size) {
            (2, 2) => {
                let from = write_u16(data, offset, MANUFACTURER);
                events.push(Event::ManufacturerForced {
                    message: DEVICE_INFO,
                    from,
                });
                changed = true;
            }
            (4, 2) => {
                let from = write_u16(data, offset, PRODUCT);
                events.push(Event::ProductForced {
                    message: DEVICE_INFO,
                    from,
                });
            }
            _ => {}
        }

        offset += size;
    }

    changed
}

/// Overwrite a little-endian `u16` field, returning the prior value.
fn write_u16(data: &mut [u8], at: usize, value: u16) -> u16 {
    let from = u16::from_le_bytes(data[at..at + 2].try_into().unwrap());
    data[at..at + 2].copy_from_slice(&value.to_le_bytes());

    from
}
