//! Docroot-backed file serving
//!
//! This module maps request paths onto files under the document root and
//! decides which document answers a request.

pub mod dispatch;
pub mod resolver;

pub use dispatch::{BodySource, Outcome, dispatch};
pub use resolver::{FileInfo, resolve};

use std::fmt;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;

use crate::config::Config;
use crate::http::response::Body;

/// A response body file could not be opened. Fatal to the connection.
#[derive(Debug)]
pub struct FileOpenFailure {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for FileOpenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "can't open file {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for FileOpenFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Opens `path` and wraps it as a streamed body of its true length.
pub async fn open_document(path: &Path) -> Result<Body, FileOpenFailure> {
    let fail = |source| FileOpenFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(fail)?;
    let len = file.metadata().await.map_err(fail)?.len();

    Ok(Body::File { file, len })
}

/// Opens a served file and checks, on the open handle, that it is the same
/// regular file the path names without following symlinks. A symlink
/// swapped in after [`resolve`] looked at the path is refused.
pub async fn open_regular_file(path: &Path) -> Result<Body, FileOpenFailure> {
    let fail = |source| FileOpenFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(fail)?;
    let opened = file.metadata().await.map_err(fail)?;
    let linked = tokio::fs::symlink_metadata(path).await.map_err(fail)?;

    if !opened.is_file() || !linked.file_type().is_file() || !same_file(&opened, &linked) {
        return Err(fail(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    Ok(Body::File {
        file,
        len: opened.len(),
    })
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_: &Metadata, _: &Metadata) -> bool {
    true
}

/// Opens whichever file `source` names under the configured docroot.
pub async fn open_body(source: &BodySource, cfg: &Config) -> Result<Body, FileOpenFailure> {
    match source {
        BodySource::File(path) => open_regular_file(path).await,
        BodySource::NotFoundDocument => open_document(&cfg.not_found_path()).await,
        BodySource::NotSupportedDocument => open_document(&cfg.not_supported_path()).await,
    }
}
