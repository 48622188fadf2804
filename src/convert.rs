//! Conversion pipeline over an owned document buffer.

use alloc::vec::Vec;

use thiserror::Error;

use crate::check;
use crate::creator;
use crate::header::{self, HeaderError};
use crate::report::{Event, Mutation};
use crate::scan;

/// An error converting a document.
///
/// Only structural header problems are fatal. A scan that stops mid-stream is
/// reported through [`Mutation::halt`] instead, with the buffer processed up
/// to that point.
#[derive(Debug, Error)]
pub enum Error {
    /// Incorrect document header.
    #[error("Incorrect document header: {0}")]
    Header(#[from] HeaderError),
}

/// Conversion options.
///
/// The defaults reproduce the established rewriting behavior; see the
/// individual options for the edge cases they tighten.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    strict_timestamps: bool,
}

impl Converter {
    /// Create a converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt the scan at compressed timestamp headers.
    ///
    /// By default a compressed timestamp header is treated as an ordinary
    /// data record keyed by its low four bits, matching longstanding
    /// behavior. Strict handling stops the scan there instead, since that
    /// folding misreads the slot key the header actually carries.
    pub fn strict_timestamps(mut self, strict: bool) -> Self {
        self.strict_timestamps = strict;
        self
    }

    /// Convert a document, returning the rewritten buffer and an account of
    /// the changes.
    ///
    /// Header normalization is unconditional. The `file_creator` splice and
    /// the trailer reseal happen only when a manufacturer field was found
    /// and overwritten; a document without one passes through with only its
    /// header versions forced.
    pub fn convert(&self, data: Vec<u8>) -> Result<Mutation, Error> {
        let mut data = data;
        let mut events = Vec::new();

        let span = header::normalize(&mut data, &mut events)?;
        let outcome = scan::scan(&mut data, span, self.strict_timestamps, &mut events);

        let mut file_creator_present = outcome.file_creator_seen;

        if outcome.manufacturer_changed {
            if !outcome.file_creator_seen {
                creator::splice(&mut data);
                file_creator_present = true;
                events.push(Event::FileCreatorInserted);
            }

            let crc = check::seal(&mut data);
            events.push(Event::TrailerSealed { crc });
        }

        Ok(Mutation {
            manufacturer_changed: outcome.manufacturer_changed,
            file_creator_present,
            halt: outcome.halt,
            events,
            data,
        })
    }
}

/// Convert a document with default options.
///
/// This method is also re-exported as `rebadge::convert`.
pub fn convert(data: Vec<u8>) -> Result<Mutation, Error> {
    Converter::new().convert(data)
}
