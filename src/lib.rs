//! hebottpd - a one-shot HTTP/1.x file server
//!
//! Core library for request parsing, docroot resolution and response writing.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
