//! Atomic extraction through a scratch directory.
//!
//! Entries are unpacked into a hidden directory inside the target. The
//! scratch tree is moved into place only once every entry has been written,
//! so a rejected archive leaves the target as it was and nothing from it is
//! ever written outside the target.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::Result;
use crate::types::DestDir;

/// Runs `extract_fn` against a fresh scratch directory and commits its
/// contents into `target` on success.
///
/// The scratch directory is created inside `target` and named
/// `.<target name>.extracting-XXXXXX`. It is removed whether or not
/// `extract_fn` succeeds.
///
/// # Errors
///
/// Returns the error from `extract_fn` unchanged, or `ExtractionError::Io`
/// if the scratch directory cannot be created or the commit fails.
///
/// A commit failure, such as a file in the archive where the target already
/// holds a directory, is not rolled back. Files that sort before the
/// conflicting path are already in place.
///
/// # Examples
///
/// ```no_run
/// use spacestore_core::extraction::atomic::atomic_extract;
/// use spacestore_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let target = DestDir::create("/tmp/uploads/acme/report")?;
/// atomic_extract(&target, |scratch| {
///     std::fs::write(scratch.as_path().join("notes.txt"), b"hello")?;
///     Ok(())
/// })?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_extract<T, F>(target: &DestDir, extract_fn: F) -> Result<T>
where
    F: FnOnce(&DestDir) -> Result<T>,
{
    let name = target
        .as_path()
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let prefix = format!(".{name}.extracting-");

    let scratch = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir_in(target.as_path())?;
    let scratch_dest = DestDir::new(scratch.path())?;

    // Dropping `scratch` on the error path removes everything unpacked so far.
    let value = extract_fn(&scratch_dest)?;

    commit(&scratch_dest, target)?;
    scratch.close()?;

    Ok(value)
}

/// Moves every file under `scratch` to the same relative path under
/// `target`, creating directories as needed. Existing files are replaced.
///
/// Each directory is read in full and sorted before anything in it moves.
fn commit(scratch: &DestDir, target: &DestDir) -> Result<()> {
    let walk = WalkDir::new(scratch.as_path())
        .min_depth(1)
        .sort_by_file_name();

    for entry in walk {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(scratch.as_path())
            .map_err(io::Error::other)?;
        let destination = target.as_path().join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            replace_file(entry.path(), &destination)?;
        }
    }

    Ok(())
}

fn replace_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}
