//! In-place rewriting of documents on disk.
//!
//! _Requires Cargo feature `std`._

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::convert::{self, Converter};
use crate::report::Mutation;

extern crate std;

/// Errors occurring while rewriting a document on disk.
#[derive(Debug, Error)]
pub enum Error {
    /// An error reading or writing the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error converting the document.
    #[error(transparent)]
    Convert(#[from] convert::Error),
}

/// Rewrite a document on disk in place, returning the conversion account.
///
/// The file is only written back once conversion has succeeded; a structural
/// header error leaves it untouched.
pub fn rewrite(path: impl AsRef<Path>, converter: Converter) -> Result<Mutation, Error> {
    let path = path.as_ref();

    let data = fs::read(path)?;
    let mutation = converter.convert(data)?;
    fs::write(path, &mutation.data)?;

    Ok(mutation)
}
