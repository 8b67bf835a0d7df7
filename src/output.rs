//! Delivering encoded bytes: in memory, to a file, or to a temp file

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::encoder::OutputFormat;
use crate::error::Error;

/// Where encoded image bytes go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// Return the bytes to the caller
    #[default]
    Bytes,
    /// Write to `path`, creating missing parent directories when `create_dirs` is set
    File { path: PathBuf, create_dirs: bool },
    /// Write to a new uniquely named file in the system temp directory
    TempFile,
}

/// Result of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Bytes(Vec<u8>),
    /// The file the image was written to
    Path(PathBuf),
}

impl Output {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Output::Bytes(bytes) => Some(bytes),
            Output::Path(_) => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Output::Bytes(_) => None,
            Output::Path(path) => Some(path),
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Output::Bytes(bytes) => Some(bytes),
            Output::Path(_) => None,
        }
    }
}

/// Hand `bytes` to `destination`
pub fn emit(bytes: Vec<u8>, destination: &Destination, format: OutputFormat) -> Result<Output, Error> {
    match destination {
        Destination::Bytes => Ok(Output::Bytes(bytes)),
        Destination::File { path, create_dirs } => {
            write_atomic(path, &bytes, *create_dirs)?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
            Ok(Output::Path(path.clone()))
        }
        Destination::TempFile => {
            let suffix = format!(".{}", format.extension());
            let temp_dir = std::env::temp_dir();
            let mut file = tempfile::Builder::new()
                .prefix("svg2img-")
                .suffix(&suffix)
                .tempfile()
                .map_err(|e| Error::io(&temp_dir, e))?;
            file.write_all(&bytes)
                .and_then(|()| file.as_file().sync_all())
                .map_err(|e| Error::io(file.path(), e))?;
            let (_, path) = file.keep().map_err(|e| Error::io(&temp_dir, e.error))?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote temp image");
            Ok(Output::Path(path))
        }
    }
}

/// Write through a temp file in the target directory, then rename into place
fn write_atomic(path: &Path, bytes: &[u8], create_dirs: bool) -> Result<(), Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if create_dirs {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut file = NamedTempFile::new_in(parent).map_err(|e| Error::io(path, e))?;
    file.write_all(bytes)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| Error::io(path, e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
