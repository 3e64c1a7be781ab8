//! Read document files named on the command line.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

use crate::domain::DocumentFile;

/// Load `path` as a document. The media type is inferred from the file
/// extension; type and size are checked later by the workflow.
pub fn read_document(path: &Path) -> io::Result<DocumentFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "document path must name a file")
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    let bytes = directory.read(Path::new(file_name))?;
    Ok(DocumentFile::with_inferred_type(
        file_name.to_string_lossy(),
        bytes,
    ))
}
