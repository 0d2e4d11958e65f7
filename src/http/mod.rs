//! HTTP protocol implementation.
//!
//! This module implements the one-shot HTTP/1.x exchange: one request in,
//! one response out, connection closed.
//!
//! # Architecture
//!
//! - **`connection`**: Drives a single connection through its state machine
//! - **`parser`**: Reads the request line and header section from a buffered stream
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read request line and headers
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Resolve path, pick status and body
//!        └──────┬───────────┘
//!               │ Body opened
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send head and body
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed
//! ```
//!
//! Any error ends the connection at the state where it occurred. Parse
//! errors and body-open failures leave the client with no bytes at all.
//!
//! # Example
//!
//! ```ignore
//! use hebottpd::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:18080").await?;
//! loop {
//!     let (socket, _addr) = listener.accept().await?;
//!     let cfg = cfg.clone();
//!     tokio::spawn(async move {
//!         if let Err(e) = Connection::new(socket, cfg).run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     });
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
