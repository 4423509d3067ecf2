use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Error;

/// Write a fully rendered artifact in a single call
///
/// Missing parent directories are created. An existing file is replaced
/// with a warning.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let output_error = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }

    if path.exists() {
        warn!(path = %path.display(), "file already exists, overwriting");
    }

    fs::write(path, bytes).map_err(output_error)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
