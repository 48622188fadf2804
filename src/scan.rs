//! Linear walk over the record stream.
//!
//! Data records carry no layout of their own; they can only be interpreted
//! through the definition most recently bound to their local message slot.
//! The scan therefore runs front to back, binding definitions as they appear
//! and dispatching data records to the patcher, and stops rather than guesses
//! when a record cannot be interpreted safely.

use alloc::vec::Vec;

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use crate::header::Span;
use crate::patch;
use crate::report::{Event, HaltReason};

/// Global message number of `file_id`.
pub const FILE_ID: u16 = 0;
/// Global message number of `device_info`.
pub const DEVICE_INFO: u16 = 23;
/// Global message number of `file_creator`.
pub const FILE_CREATOR: u16 = 49;

/// A single field layout within a definition record.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, FromBytes)]
pub struct FieldDefinition {
    /// Field number within the message kind.
    pub number: u8,
    /// Field width in bytes.
    pub size: u8,
    /// FIT base type of the field.
    pub base_type: u8,
}

/// The field layout bound to a local message slot.
#[derive(Debug)]
pub struct MessageDefinition {
    /// Global message number this layout describes.
    pub global_message: u16,
    /// Field layouts in declaration order.
    pub fields: Vec<FieldDefinition>,
}

impl MessageDefinition {
    /// Byte length of a data record carrying this layout.
    pub fn wire_size(&self) -> usize {
        self.fields.iter().map(|f| f.size as usize).sum()
    }
}

/// Most recent layout bound to each of the sixteen local message slots.
///
/// A later definition for a slot replaces the earlier one; the format keeps
/// no history.
#[derive(Debug, Default)]
pub struct DefinitionTable([Option<MessageDefinition>; 16]);

impl DefinitionTable {
    /// Bind a layout to a slot, overwriting any prior binding.
    pub fn bind(&mut self, local: u8, definition: MessageDefinition) {
        self.0[(local & 0x0F) as usize] = Some(definition);
    }

    /// Retrieve the layout currently bound to a slot.
    pub fn lookup(&self, local: u8) -> Option<&MessageDefinition> {
        self.0[(local & 0x0F) as usize].as_ref()
    }
}

/// What a completed scan found and changed.
#[derive(Debug)]
pub struct Outcome {
    /// Whether a manufacturer field was overwritten.
    pub manufacturer_changed: bool,
    /// Whether a `file_creator` definition was observed.
    pub file_creator_seen: bool,
    /// Why the scan stopped early, if it did.
    pub halt: Option<HaltReason>,
}

bitfield! {
    struct RecordHeader(u8) {
        [0..4] local_message: u8,
        [6] is_definition,
        [7] is_compressed,
    }
}

/// A data record header, keyed by its low four bits.
struct DataHeader {
    local_message: u8,
    compressed: bool,
}

/// Classify a record header byte.
///
/// Returns the local slot of a definition record on the left, or a data
/// record header on the right. Compressed timestamp headers land on the
/// right: their low four bits are treated as an ordinary slot key.
fn classify(byte: u8) -> Either<u8, DataHeader> {
    let header = RecordHeader(byte);

    if !header.is_compressed() && header.is_definition() {
        Left(header.local_message())
    } else {
        Right(DataHeader {
            local_message: header.local_message(),
            compressed: header.is_compressed(),
        })
    }
}

/// Walk the record stream, patching identity fields in place.
pub fn scan(
    data: &mut [u8],
    span: Span,
    strict_timestamps: bool,
    events: &mut Vec<Event>,
) -> Outcome {
    let mut table = DefinitionTable::default();
    let mut outcome = Outcome {
        manufacturer_changed: false,
        file_creator_seen: false,
        halt: None,
    };

    let mut pos = span.start;

    while pos < span.end {
        let header = classify(data[pos]);
        pos += 1;

        match header {
            Left(local) => {
                let Some(definition) = read_definition(data, &mut pos) else {
                    outcome.halt = Some(HaltReason::Truncated);
                    break;
                };

                if definition.global_message == FILE_CREATOR {
                    outcome.file_creator_seen = true;
                    events.push(Event::FileCreatorObserved);
                }

                table.bind(local, definition);
            }
            Right(record) => {
                if record.compressed && strict_timestamps {
                    outcome.halt = Some(HaltReason::CompressedTimestamp);
                    break;
                }

                let Some(definition) = table.lookup(record.local_message) else {
                    outcome.halt = Some(HaltReason::UnknownLocalType);
                    break;
                };

                outcome.manufacturer_changed |= patch::apply(data, pos, definition, events);
                pos += definition.wire_size();
            }
        }
    }

    outcome
}

/// Read the body of a definition record, advancing the offset past it.
///
/// Returns `None` when the document ends before the declared field count.
fn read_definition(data: &[u8], i: &mut usize) -> Option<MessageDefinition> {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct DefinitionHeader {
        _reserved: u8,
        _architecture: u8,
        global_message: [u8; 2],
        field_count: u8,
    }

    let raw: [u8; 5] = take(data, i)?;
    let DefinitionHeader {
        global_message,
        field_count,
        ..
    } = zerocopy::transmute!(raw);

    let global_message = u16::from_le_bytes(global_message);

    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        let raw: [u8; 3] = take(data, i)?;
        fields.push(zerocopy::transmute!(raw));
    }

    Some(MessageDefinition {
        global_message,
        fields,
    })
}

/// Take an exact number of bytes from an offset in a slice, advancing the offset.
fn take<const N: usize>(r: &[u8], i: &mut usize) -> Option<[u8; N]> {
    let s = *i;
    *i = s + N;

    Some(r.get(s..*i)?.try_into().unwrap())
}
