use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, SinceError};

/// Resolve a changelog path against the repository directory.
///
/// A bare file name lives in `dir`; anything containing a path separator is
/// used as given.
pub fn resolve_changelog_file(dir: &Path, file_name: &str) -> PathBuf {
    if file_name.contains(['/', '\\']) {
        PathBuf::from(file_name)
    } else {
        dir.join(file_name)
    }
}

/// Read a changelog as lines
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SinceError::not_found(format!("changelog file {}", path.display()))
        } else {
            SinceError::Io(e)
        }
    })?;
    Ok(content.split('\n').map(str::to_string).collect())
}

/// Replace the changelog with new content, ending it with a newline.
///
/// The content goes to a temporary file in the same directory first, which
/// is then renamed over the target.
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.write_all(b"\n")?;
    temp.flush()?;
    temp.persist(path).map_err(|e| SinceError::Io(e.error))?;

    debug!(file = %path.display(), "updated changelog");
    Ok(())
}
