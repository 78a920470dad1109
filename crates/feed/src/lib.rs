#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`FeedFetchError`)
//! - [`id`]: Feed identifiers and URL layout (`FeedId`, `FIRST_FEED_YEAR`)
//! - [`meta`]: `.meta` descriptor parsing (`FeedMetadata`)
//! - [`store`]: Local cache directory (`FeedStore`, SHA-256 helpers)
//! - [`fetch`]: Concurrent downloader (`FeedClient`, `FetchStatus`, `FeedOutcome`)
//! - [`ingest`]: Feed JSON to document conversion (`collection_from_json`, `load_cached`)
//!
//! # Architecture
//!
//! ```text
//! FeedId list --> FeedClient --> .meta fetch --> digest compare --> up to date
//!                                                     |
//!                                               .json.gz fetch
//!                                                     |
//!                                         gunzip + sha256 (spawn_blocking)
//!                                                     |
//!                                                 FeedStore
//!                                                     |
//!                                    ingest::load_cached --> Collection
//! ```

pub mod error;
pub mod fetch;
pub mod id;
pub mod ingest;
pub mod meta;
pub mod store;

// --- Public API Re-exports ---

// Downloader (main orchestrator)
pub use fetch::{FeedClient, FeedOutcome, FetchStatus};

// Error
pub use error::FeedFetchError;

// Feed identity
pub use id::{FeedId, FIRST_FEED_YEAR};

// Metadata
pub use meta::FeedMetadata;

// Local cache
pub use store::{hash_bytes, hash_file, FeedStore};

// Ingest
pub use ingest::{collection_from_json, document_from_record, documents_from_json, load_cached};
