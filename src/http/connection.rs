use std::fmt;
use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use crate::config::Config;
use crate::http::parser::{ParseError, read_request};
use crate::http::request::{Method, Request};
use crate::http::response::{ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::static_files::{self, FileOpenFailure};

/// Why a connection ended without a complete response.
#[derive(Debug)]
pub enum ConnectionError {
    Parse(ParseError),
    FileOpen(FileOpenFailure),
    Write(io::Error),
    /// A read or write deadline expired; names the phase.
    Timeout(&'static str),
    /// `run` was called again after the connection already finished.
    AlreadyFinished,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::Parse(e) => write!(f, "HTTP parse error: {}", e),
            ConnectionError::FileOpen(e) => write!(f, "{}", e),
            ConnectionError::Write(e) => write!(f, "can't write response: {}", e),
            ConnectionError::Timeout(phase) => write!(f, "timed out while {}", phase),
            ConnectionError::AlreadyFinished => f.write_str("connection already finished"),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Parse(e) => Some(e),
            ConnectionError::FileOpen(e) => Some(e),
            ConnectionError::Write(e) => Some(e),
            ConnectionError::Timeout(_) | ConnectionError::AlreadyFinished => None,
        }
    }
}

impl From<ParseError> for ConnectionError {
    fn from(e: ParseError) -> Self {
        ConnectionError::Parse(e)
    }
}

impl From<FileOpenFailure> for ConnectionError {
    fn from(e: FileOpenFailure) -> Self {
        ConnectionError::FileOpen(e)
    }
}

/// Summary of a response that was fully sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub body_bytes: u64,
}

/// Drives exactly one request/response exchange over a duplex stream.
pub struct Connection<S> {
    stream: BufReader<S>,
    config: Arc<Config>,
    state: ConnectionState,
}

enum ConnectionState {
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter, Served),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            config,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. On error nothing further is
    /// written; if the error came before the head was sent, the client
    /// receives no bytes at all. The write deadline bounds each stall of
    /// the peer, not the whole transfer.
    pub async fn run(&mut self) -> Result<Served, ConnectionError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let req = timeout(
                        self.config.server.read_timeout(),
                        read_request(&mut self.stream),
                    )
                    .await
                    .map_err(|_| ConnectionError::Timeout("reading request"))??;

                    self.state = ConnectionState::Dispatching(req);
                }

                ConnectionState::Dispatching(req) => {
                    let (writer, served) = Self::prepare_response(&self.config, req).await?;
                    self.state = ConnectionState::Writing(writer, served);
                }

                ConnectionState::Writing(writer, mut served) => {
                    served.body_bytes = writer
                        .idle_timeout(self.config.server.write_timeout())
                        .write_to_stream(&mut self.stream)
                        .await
                        .map_err(|e| match e.kind() {
                            io::ErrorKind::TimedOut => ConnectionError::Timeout("writing response"),
                            _ => ConnectionError::Write(e),
                        })?;

                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Shutdown after response failed");
                    }

                    return Ok(served);
                }

                ConnectionState::Closed => return Err(ConnectionError::AlreadyFinished),
            }
        }
    }

    async fn prepare_response(
        config: &Config,
        req: Request,
    ) -> Result<(ResponseWriter, Served), ConnectionError> {
        let files = &config.static_files;
        let info = static_files::resolve(&req.path, &files.docroot).await;
        let outcome = static_files::dispatch(&req.method, &info);

        tracing::debug!(
            method = %req.method,
            path = %req.path,
            resolved = %info.resolved_path.display(),
            status = outcome.status.as_u16(),
            "Dispatched request"
        );

        let body = static_files::open_body(&outcome.body, config).await?;

        let response = ResponseBuilder::new(outcome.status)
            .minor_version(req.minor_version)
            .server(config.server.server_name.clone())
            .body(body)
            .build();

        let served = Served {
            method: req.method,
            path: req.path,
            status: outcome.status,
            body_bytes: 0,
        };

        Ok((ResponseWriter::new(response), served))
    }
}
