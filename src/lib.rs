//! Bookshelf application library
//!
//! The catalog and reservations modules plus the bootstrap that wires them
//! to storage and the HTTP server

pub mod bootstrap;
pub mod modules;

pub use bootstrap::{app, serve, StoreBackend};
