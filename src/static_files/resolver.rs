use std::path::{Component, Path, PathBuf};

/// What a single filesystem lookup said about a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// The request path joined under the docroot
    pub resolved_path: PathBuf,
    /// True byte length; 0 unless `is_regular_file`
    pub size: u64,
    pub exists: bool,
    pub is_regular_file: bool,
}

impl FileInfo {
    fn missing(resolved_path: PathBuf) -> Self {
        Self {
            resolved_path,
            size: 0,
            exists: false,
            is_regular_file: false,
        }
    }
}

/// Resolves `request_path` under `docroot` without following symlinks.
///
/// Paths carrying `..` (or anything else that could leave the docroot) are
/// reported as missing. Nothing is cached.
pub async fn resolve(request_path: &str, docroot: &Path) -> FileInfo {
    let Some(resolved_path) = build_path(request_path, docroot) else {
        tracing::debug!(path = %request_path, "Rejected path outside docroot");
        return FileInfo::missing(docroot.join(strip_query(request_path).trim_start_matches('/')));
    };

    let meta = match tokio::fs::symlink_metadata(&resolved_path).await {
        Ok(meta) => meta,
        Err(e) => {
            tracing::debug!(path = %resolved_path.display(), error = %e, "Lookup failed");
            return FileInfo::missing(resolved_path);
        }
    };

    if !meta.file_type().is_file() {
        return FileInfo {
            resolved_path,
            size: 0,
            exists: true,
            is_regular_file: false,
        };
    }

    FileInfo {
        resolved_path,
        size: meta.len(),
        exists: true,
        is_regular_file: true,
    }
}

/// Joins the request path under the docroot, keeping only plain components.
pub fn build_path(request_path: &str, docroot: &Path) -> Option<PathBuf> {
    let relative = strip_query(request_path).trim_start_matches('/');
    let mut path = docroot.to_path_buf();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(path)
}

fn strip_query(request_path: &str) -> &str {
    request_path
        .split_once('?')
        .map_or(request_path, |(path, _)| path)
}
