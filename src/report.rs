//! Structured account of a conversion.
//!
//! Diagnostics are collected per call and returned with the result rather
//! than routed through shared logging state, so concurrent conversions never
//! interleave their accounts.

use alloc::vec::Vec;

/// Why a scan stopped before the end of the record stream.
///
/// A halt is an expected, data-dependent outcome, not a fault: the buffer
/// processed up to the halt is still returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// A definition record declared more bytes than the document holds.
    Truncated,
    /// A data record referenced a local message slot with no bound layout.
    UnknownLocalType,
    /// A compressed timestamp header was found under strict handling.
    CompressedTimestamp,
}

/// A diagnostic event, recorded in the order it occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The header's protocol version was rewritten.
    ProtocolVersionForced { from: u8 },
    /// The header's profile version was rewritten.
    ProfileVersionForced { from: u16 },
    /// A `file_id` type field was rewritten to activity.
    FileTypeForced { from: u8 },
    /// A manufacturer field was rewritten, in the given message kind.
    ManufacturerForced { message: u16, from: u16 },
    /// A product field was rewritten, in the given message kind.
    ProductForced { message: u16, from: u16 },
    /// A `file_id` creation timestamp, in seconds since the FIT epoch.
    TimeCreated { seconds: u32 },
    /// The stream already carries a `file_creator` definition.
    FileCreatorObserved,
    /// A synthesized `file_creator` block was spliced in.
    FileCreatorInserted,
    /// The trailer was rewritten with a freshly computed check value.
    TrailerSealed { crc: u16 },
}

/// The product of a conversion.
#[derive(Clone, Debug)]
pub struct Mutation {
    /// Whether a manufacturer field was found and overwritten.
    pub manufacturer_changed: bool,
    /// Whether the output holds a `file_creator` definition, observed in the
    /// input or synthesized.
    pub file_creator_present: bool,
    /// Why the scan stopped early, if it did.
    pub halt: Option<HaltReason>,
    /// Diagnostic events in occurrence order.
    pub events: Vec<Event>,
    /// The rewritten document.
    pub data: Vec<u8>,
}
