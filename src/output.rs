//! Writing artifacts to disk
//!
//! A destination either holds the complete new content or is left untouched: data is written to a
//! temporary sibling which is then renamed over the destination.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::Error;

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Atomically replaces the contents of `path` with `data`
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Error> {
    let tmp = temporary_path(path);

    let result = write_file(&tmp, data).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = result {
        // The temporary file may not exist
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }

    log::info!("wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}
