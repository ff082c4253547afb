//! HTTP handlers for midibox-api.
//!
//! `index`, `upload` and `download` back the HTML page. `api` serves the
//! JSON listing and the health check.

pub mod api;
pub mod download;
pub mod index;
pub mod upload;
