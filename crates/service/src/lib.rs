//! Shared service core for the picdock gateway.
//!
//! This crate provides everything behind the HTTP surface of the images
//! emulator:
//! - Database (SQLite metadata store for accounts and images)
//! - Blob store (filesystem storage for originals and converted artifacts)
//! - Conversion (WebP re-encoding of stored originals)
//! - Upload worker (background queue for deferred store/convert work)
//! - Ingestion operations (upload slots, completion, direct upload, serving)
//! - HTTP routers and handlers

pub mod blobs;
pub mod config;
pub mod convert;
pub mod database;
pub mod http_server;
pub mod ingest;
pub mod state;
pub mod worker;

// Re-export key types for convenience
pub use config::Config;
pub use database::{Database, DatabaseSetupError};
pub use state::{State as ServiceState, StateSetupError};
pub use worker::{run_worker, UploadJob, UploadQueue};
