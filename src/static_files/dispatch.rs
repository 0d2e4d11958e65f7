use std::path::PathBuf;

use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::static_files::resolver::FileInfo;

/// Which file supplies the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// The resolved request target
    File(PathBuf),
    /// The docroot's not-found fallback document
    NotFoundDocument,
    /// The docroot's not-supported fallback document
    NotSupportedDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: StatusCode,
    pub body: BodySource,
}

/// Chooses the response for a request. Only GET of a regular file succeeds.
pub fn dispatch(method: &Method, info: &FileInfo) -> Outcome {
    match method {
        Method::GET if info.is_regular_file => Outcome {
            status: StatusCode::Ok,
            body: BodySource::File(info.resolved_path.clone()),
        },
        Method::GET => Outcome {
            status: StatusCode::NotFound,
            body: BodySource::NotFoundDocument,
        },
        _ => Outcome {
            status: StatusCode::MethodNotAllowed,
            body: BodySource::NotSupportedDocument,
        },
    }
}
