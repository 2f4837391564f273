//! matserve - material image front-end for a blob store
//!
//! This library crate exposes the core functionality for integration testing.

pub mod blob;
pub mod config;
pub mod images;
pub mod server;
