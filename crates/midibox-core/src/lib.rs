//! # midibox-core
//!
//! Core types, traits, and abstractions for midibox.
//!
//! This crate provides the data model for catalogued MIDI files, the
//! `CatalogRepository` trait implemented by the storage crate, and the
//! filename safety rules shared by every upload path.
//!
//! ## Log conventions
//!
//! Every crate logs with `subsystem` ("api", "database", "storage") and,
//! where it applies, `component` and `op` fields.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed on storage or database |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events, completed uploads |
//! | DEBUG | Rejected input, redirects |
//! | TRACE | Per-query detail |

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod models;
pub mod traits;
pub mod upload;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_safety::{detect_content_type, sanitize_filename};
pub use models::*;
pub use traits::*;
pub use upload::{UploadCommand, UploadRejection};
