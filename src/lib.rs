//! Chunked, paginated, retrying query access for Azure Log Analytics
//! workspaces.
//!
//! A large resource fleet cannot be queried in one KQL call: the backend
//! caps how many ids fit in a query, and each resource must be queried in
//! the workspace that owns it. This crate fans a flat resource-id list out
//! across those limits and folds the results back into one logical answer:
//!
//! 1. [`chunking::grouped_chunks`] groups ids by workspace and slices each
//!    group into bounded chunks.
//! 2. [`orchestrator::ChunkedQueryOrchestrator`] runs one KQL query per
//!    chunk through [`client::LogsQueryClient`], which follows continuation
//!    tokens page by page; transient transport failures are retried with a
//!    fixed backoff.
//! 3. The per-chunk payloads merge into one [`response::LogsResponse`],
//!    exposable as a typed columnar [`frame::DataFrame`].
//!
//! Credentials and the HTTP stack are injected: implement
//! [`auth::TokenCredential`] and [`client::QueryTransport`] over whatever
//! your host already uses. Progress and embedded-error totals are emitted
//! through `tracing`; the crate never installs a subscriber.
//!
//! # Module structure
//!
//! - [`error`] — error taxonomy and `Result` alias
//! - [`chunking`] — workspace grouping and chunk slicing
//! - [`frame`] — column descriptors, typed columns, row decoding
//! - [`kql`] — KQL literal serialization
//! - [`queries`] — stock KQL builders for perf-counter percentile reports
//! - [`resource`] — ARM resource-id helpers and account handles
//! - [`auth`] — token credential seam
//! - [`wire`] — raw wire structs and boundary normalization
//! - [`response`] — response model, merger, frame adapter
//! - [`client`] — paginated query client over an injected transport
//! - [`orchestrator`] — chunked query orchestration with retry

pub mod auth;
pub mod chunking;
pub mod client;
pub mod error;
pub mod frame;
pub mod kql;
pub mod orchestrator;
pub mod queries;
pub mod resource;
pub mod response;
pub mod wire;

// Re-export the most commonly used items at the crate root.
pub use auth::{AccessToken, LOG_ANALYTICS_SCOPE, StaticTokenCredential, TokenCredential};
pub use chunking::{ChunkGroup, DEFAULT_CHUNK_SIZE, GroupedChunkList, grouped_chunks};
pub use client::{
    DEFAULT_PAGE_LIMIT, LogsQueryClient, QueryOptions, QueryRequest, QueryTransport, RawPage,
    Workspaces,
};
pub use error::{Error, Result, TransportError};
pub use frame::{Column, ColumnDescriptor, ColumnType, DataFrame};
pub use orchestrator::{ChunkRetryConfig, ChunkedQueryOrchestrator};
pub use response::{ErrorDetail, ErrorInfo, LogsResponse, Table, TableKind};
