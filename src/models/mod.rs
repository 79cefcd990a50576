//! Core data model for the waste-bin tracking service.
//!
//! The sole entity is the waste bin record. It serializes the same way over
//! HTTP and in the JSON data file via `serde`.

pub mod bin;
