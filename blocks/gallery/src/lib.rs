//! Use cases of the image pipeline, composed from the atoms.
//!
//! - [`ingest`]: analyze an upload and store its metadata record
//! - [`thumbnails`]: write a resized copy of an upload
//! - [`search`]: list, search and fetch records over HTTP

pub mod ingest;
pub mod search;
pub mod thumbnails;
pub mod types;
