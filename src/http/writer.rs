use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::response::{Body, Response, ResponseBuilder, StatusCode};

/// Read size when streaming a file body.
const COPY_BUFFER_SIZE: usize = 8192;

/// Serializes the status line and header section, blank line included.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "HTTP/1.{} {} {}\r\n",
        resp.minor_version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for h in &resp.headers {
        buf.extend_from_slice(h.name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(h.value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response. The head goes out first and cannot be taken back;
/// the body follows unmodified.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
    idle_timeout: Option<Duration>,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
            idle_timeout: None,
        }
    }

    /// Fails with `TimedOut` when the peer accepts no bytes for `idle`.
    /// A slow reader that keeps draining is never cut off.
    pub fn idle_timeout(mut self, idle: Duration) -> Self {
        self.idle_timeout = Some(idle);
        self
    }

    /// Sends head and body, flushes, and returns the number of body bytes
    /// written. A file body never exceeds the length announced in
    /// `Content-Length`.
    pub async fn write_to_stream<W>(self, stream: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let idle = self.idle_timeout;
        write_chunk(stream, &self.head, idle).await?;

        let written = match self.body {
            Body::Bytes(bytes) => {
                write_chunk(stream, &bytes, idle).await?;
                bytes.len() as u64
            }
            Body::File { file, len } => {
                let mut file = file.take(len);
                let mut buf = vec![0u8; COPY_BUFFER_SIZE];
                let mut written = 0u64;
                loop {
                    let n = file.read(&mut buf).await?;
                    if n == 0 {
                        break;
                    }
                    write_chunk(stream, &buf[..n], idle).await?;
                    written += n as u64;
                }
                written
            }
        };

        with_idle_timeout(idle, stream.flush()).await?;
        Ok(written)
    }
}

/// `write_all`, with the idle deadline applied to every individual write so
/// the clock restarts whenever the peer accepts bytes.
async fn write_chunk<W>(stream: &mut W, mut buf: &[u8], idle: Option<Duration>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while !buf.is_empty() {
        let n = with_idle_timeout(idle, stream.write(buf)).await?;
        if n == 0 {
            return Err(io::ErrorKind::WriteZero.into());
        }
        buf = &buf[n..];
    }
    Ok(())
}

async fn with_idle_timeout<F, T>(idle: Option<Duration>, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match idle {
        Some(idle) => timeout(idle, fut)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "peer stopped reading"))?,
        None => fut.await,
    }
}

/// Builds and sends a response in one call.
pub async fn write_response<W>(
    stream: &mut W,
    minor_version: u8,
    status: StatusCode,
    server: &str,
    body: Body,
) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let response = ResponseBuilder::new(status)
        .minor_version(minor_version)
        .server(server)
        .body(body)
        .build();

    ResponseWriter::new(response).write_to_stream(stream).await
}
