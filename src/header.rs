//! Validation and normalization of the document header.

use alloc::vec::Vec;
use thiserror::Error;
use zerocopy::FromBytes;

use crate::report::Event;

/// Protocol version written into every output header (1.0).
pub const PROTOCOL_VERSION: u8 = 16;
/// Profile version written into every output header.
pub const PROFILE_VERSION: u16 = 2134;

/// An error validating a document header.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Document too short to hold a header and trailer.
    #[error("Document too short to hold a header and trailer.")]
    TooShort,
    /// Incorrect file type marker.
    #[error("Incorrect file type marker.")]
    BadSignature,
    /// Header length below the fixed minimum.
    #[error("Header length ({0}) below the fixed minimum.")]
    HeaderTooShort(u8),
}

/// Bounds of the record stream within a document.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    /// Offset of the first record header byte.
    pub start: usize,
    /// Offset one past the last record byte, never inside the trailer.
    pub end: usize,
}

/// Validate a document header and force its versions in place.
///
/// Returns the bounds of the record stream. The version rewrites happen
/// whether or not any later patch succeeds.
pub fn normalize(data: &mut [u8], events: &mut Vec<Event>) -> Result<Span, HeaderError> {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct FileHeader {
        header_size: u8,
        protocol_version: u8,
        profile_version: [u8; 2],
        data_size: [u8; 4],
        data_type: [u8; 4],
    }

    if data.len() < 14 {
        Err(HeaderError::TooShort)?;
    }

    let raw: [u8; 12] = data[..12].try_into().unwrap();
    let FileHeader {
        header_size,
        protocol_version,
        profile_version,
        data_size,
        data_type,
    } = zerocopy::transmute!(raw);

    if &data_type != b".FIT" {
        Err(HeaderError::BadSignature)?;
    }

    if header_size < 12 {
        Err(HeaderError::HeaderTooShort(header_size))?;
    }

    if protocol_version != PROTOCOL_VERSION {
        data[1] = PROTOCOL_VERSION;
        events.push(Event::ProtocolVersionForced {
            from: protocol_version,
        });
    }

    let profile = u16::from_le_bytes(profile_version);
    if profile != PROFILE_VERSION {
        data[2..4].copy_from_slice(&PROFILE_VERSION.to_le_bytes());
        events.push(Event::ProfileVersionForced { from: profile });
    }

    let start = header_size as usize;
    let payload = u32::from_le_bytes(data_size) as usize;
    let end = usize::min(start + payload, data.len() - 2);

    Ok(Span { start, end })
}

/// Grow the payload size declared in the header at offset 4.
pub fn grow_payload(data: &mut [u8], delta: u32) {
    let size = u32::from_le_bytes(data[4..8].try_into().unwrap());
    data[4..8].copy_from_slice(&(size + delta).to_le_bytes());
}
