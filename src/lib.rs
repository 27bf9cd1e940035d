//! FastDFS-style distributed file storage client
//!
//! Async, type-safe client for a tracker-plus-storage distributed file
//! storage cluster. Provides a high-level API over the binary wire protocol,
//! with connection pooling, retry, and tracker/storage failover built in.
//!
//! # Features
//!
//! - File upload (normal, appender, slave files)
//! - File download (full and partial, streaming and whole-buffer)
//! - File deletion, append, modify, truncate
//! - Metadata operations (set, get)
//! - Per-endpoint connection pooling with idle eviction
//! - Automatic retry with tracker rotation and storage failover
//! - Cooperative cancellation via `tokio_util::sync::CancellationToken`
//! - Structured logging via `tracing` (the caller installs the subscriber)
//!
//! # Example
//!
//! ```no_run
//! use fastdfs::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new(vec!["192.168.1.100:22122".to_string()]);
//!     let client = Client::new(config)?;
//!
//!     let file_id = client.upload_buffer(b"Hello, FastDFS!", "txt", None).await?;
//!     let data = client.download_file(&file_id).await?;
//!     client.delete_file(&file_id).await?;
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod errors;
mod operations;
mod pool;
pub mod protocol;
mod storage;
mod tracker;
mod transport;
pub mod types;

// Re-export public API
pub use client::Client;
pub use errors::{FastDFSError, Result};
pub use types::{
    ClientConfig, FileInfo, Metadata, MetadataFlag, StorageCommand, StorageServer, TrackerCommand,
};

pub use tokio_util::sync::CancellationToken;
