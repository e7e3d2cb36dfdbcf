//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::Path;

/// Write content only if the file does not exist yet.
///
/// Returns `Ok(false)` when an existing file was left untouched.
pub fn write_new_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<bool> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            io::Write::write_all(&mut file, contents.as_ref())?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}
