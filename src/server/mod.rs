//! Connection driver: the listening socket and per-connection tasks.

pub mod listener;
