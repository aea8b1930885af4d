//! Capability-scoped file reads.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io;

/// Reads a UTF-8 text file through a directory capability.
///
/// The parent directory is opened with ambient authority and the file is
/// read relative to it. A bare file name resolves against the working
/// directory.
///
/// # Errors
///
/// Returns an I/O error when the path has no file name, the directory
/// cannot be opened, or the file cannot be read as UTF-8.
pub fn read_text_file(path: &Utf8Path) -> io::Result<String> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path has no file name: {path}"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}
