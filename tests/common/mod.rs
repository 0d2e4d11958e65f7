//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hebottpd::config::Config;

pub const NOT_FOUND_BODY: &[u8] = b"<html><body>404 not found</body></html>\n";
pub const NOT_SUPPORTED_BODY: &[u8] = b"<html><body>405 not supported</body></html>\n";

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A scratch docroot holding both fallback documents, removed on drop.
pub struct TempDocroot {
    path: PathBuf,
}

impl TempDocroot {
    pub fn new() -> Self {
        let dir = Self::empty();
        dir.write("not-found.html", NOT_FOUND_BODY);
        dir.write("not-supported.html", NOT_SUPPORTED_BODY);
        dir
    }

    /// A docroot without fallback documents.
    pub fn empty() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "hebottpd-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, contents: &[u8]) {
        let target = self.path.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, contents).unwrap();
    }

    pub fn config(&self) -> Arc<Config> {
        let mut cfg = Config::default();
        cfg.static_files.docroot = self.path.clone();
        cfg.server.read_timeout_secs = 5;
        cfg.server.write_timeout_secs = 5;
        Arc::new(cfg)
    }
}

impl Drop for TempDocroot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Splits a raw response into (head, body) at the first blank line.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    (head, raw[end + 4..].to_vec())
}
