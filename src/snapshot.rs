//! Whole-file snapshot writes shared by the table and the index.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// Replaces the contents of `path` with whatever `write` produces.
///
/// Regular files are written to a temporary sibling, flushed, synced and
/// renamed over the target, so a failed or interrupted write leaves the
/// previous snapshot intact. Anything else that already exists at `path`
/// (a device, a pipe) is written in place. Every write and flush error is
/// returned, none is left to a drop.
pub(crate) fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> io::Result<()>,
{
    if path.exists() && !path.is_file() {
        let mut file = File::create(path)?;
        return write_all(&mut file, write);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    write_all(temp.as_file_mut(), write)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

fn write_all<F>(file: &mut File, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()
}
