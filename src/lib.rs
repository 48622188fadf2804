#![no_std]

//! A binary rewriter stamping Garmin device identity onto FIT activity
//! documents.
//!
//! Rebadge walks the record stream of a document, overwrites the manufacturer
//! and product fields of `file_id` and `device_info` messages with those of a
//! Garmin Edge 830, inserts a `file_creator` message where one is missing, and
//! reseals the trailing cyclic redundancy check. The header's protocol and
//! profile versions are normalized to values Garmin Connect accepts.
//!
//! Most users should begin with [`convert`], which applies the default options
//! to an owned buffer and returns a [`Mutation`] holding the rewritten bytes
//! alongside a structured account of what changed. See [`Converter`] for
//! control over edge-case handling, and [`file::rewrite`] to process documents
//! on disk in place.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable in-place rewriting of files on disk (default).

extern crate alloc;

pub mod check;
pub mod convert;
pub mod creator;
#[cfg(feature = "std")]
pub mod file;
pub mod header;
pub mod patch;
pub mod report;
pub mod scan;

pub use convert::{Converter, Error, convert};
pub use report::{Event, HaltReason, Mutation};
