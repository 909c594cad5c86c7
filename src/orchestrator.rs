//! Chunked query orchestration.
//!
//! Drives a [`GroupedChunkList`] through the paginated client one chunk at a
//! time: build the chunk's KQL via the caller's query builder, run it against
//! the group's workspace, retry transient transport failures with a fixed
//! delay, and fold every chunk payload into one merged response whose row
//! order mirrors chunk processing order.
//!
//! Processing is deliberately sequential — the backend's own per-query and
//! per-workspace limits are the only throttling needed, at the cost of
//! end-to-end latency scaling with chunk count.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::chunking::GroupedChunkList;
use crate::client::{LogsQueryClient, QueryOptions};
use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::response::LogsResponse;

/// Retry and timeout knobs for chunk queries.
#[derive(Clone, Debug)]
pub struct ChunkRetryConfig {
    /// Max attempts per chunk query, including the first try.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Server-side wait hint per chunk query.
    pub server_timeout: Duration,
}

impl Default for ChunkRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
            server_timeout: Duration::from_secs(300),
        }
    }
}

/// Runs chunked queries sequentially and merges their payloads.
pub struct ChunkedQueryOrchestrator {
    client: LogsQueryClient,
    config: ChunkRetryConfig,
}

impl ChunkedQueryOrchestrator {
    pub fn new(client: LogsQueryClient) -> Self {
        Self {
            client,
            config: ChunkRetryConfig::default(),
        }
    }

    /// Override the retry/timeout policy (tests shrink the delay to zero).
    pub fn with_config(mut self, config: ChunkRetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Query every chunk and merge the payloads in processing order.
    ///
    /// `query_builder` turns one chunk's values into KQL source; each chunk
    /// runs against its group's workspace. A transient transport failure is
    /// retried up to `max_attempts` times with a fixed delay; exhaustion, or
    /// any fatal error, aborts the whole run with no partial result.
    /// Backend-embedded per-row errors never abort — they are counted,
    /// logged after the last chunk, and folded into the merged response.
    pub fn run<V, F>(
        &self,
        chunked: &GroupedChunkList<V>,
        query_builder: F,
        timespan: Option<&str>,
    ) -> Result<LogsResponse>
    where
        V: std::fmt::Debug,
        F: Fn(&[V]) -> String,
    {
        if chunked.is_empty() {
            return Err(Error::InvalidArgument("no chunks to query".into()));
        }

        info!(
            chunk_count = chunked.len(),
            workspace_count = chunked.groups.len(),
            "starting chunked query"
        );

        let options = QueryOptions {
            timespan: timespan.map(str::to_string),
            server_timeout: Some(self.config.server_timeout),
            // Retry is orchestrated here, not delegated to the transport.
            retries: Some(0),
        };

        let mut payloads: Vec<LogsResponse> = Vec::new();
        let mut total_errors = 0usize;
        let mut chunk_index = 0usize;
        for group in &chunked.groups {
            info!(
                workspace = %group.key,
                chunks = group.len(),
                "querying workspace"
            );
            for chunk in &group.chunks {
                debug!(size = chunk.len(), resources = ?chunk, "querying chunk");
                let query = query_builder(chunk);
                let response = self.query_with_retry(&group.key, &query, &options)?;
                let errors = response.errors_count();
                chunk_index += 1;
                info!(
                    chunk = chunk_index,
                    total = chunked.len(),
                    errors,
                    "chunk query complete"
                );
                total_errors += errors;
                payloads.push(response);
            }
        }

        if total_errors > 0 {
            error!(total_errors, "finished chunked query with embedded errors");
        } else {
            info!(total_errors, "finished chunked query");
        }

        LogsResponse::merge(payloads)
    }

    /// Convenience: run and decode the merged primary table into a frame.
    pub fn run_frame<V, F>(
        &self,
        chunked: &GroupedChunkList<V>,
        query_builder: F,
        timespan: Option<&str>,
    ) -> Result<DataFrame>
    where
        V: std::fmt::Debug,
        F: Fn(&[V]) -> String,
    {
        self.run(chunked, query_builder, timespan)?.primary_frame()
    }

    fn query_with_retry(
        &self,
        workspace: &str,
        query: &str,
        options: &QueryOptions,
    ) -> Result<LogsResponse> {
        let mut attempt = 1u32;
        loop {
            match self.client.query(workspace, query, options) {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && attempt < self.config.max_attempts => {
                    warn!(
                        workspace,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %err,
                        "transient chunk query failure; retrying"
                    );
                    std::thread::sleep(self.config.retry_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
