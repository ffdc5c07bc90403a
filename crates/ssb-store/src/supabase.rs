//! Supabase Store Implementation
//!
//! Reads substances and interactions through the Supabase REST API
//! (PostgREST at `{url}/rest/v1`).
//!
//! # Features
//!
//! - One HTTP round trip per batch lookup
//! - Per-request timeout
//! - Retry with exponential backoff on transport errors, 5xx and 429
//!
//! # Examples
//!
//! ```no_run
//! use ssb_store::{SupabaseConfig, SupabaseStore};
//!
//! let config = SupabaseConfig::new("https://xyz.supabase.co", "service-role-key");
//! let store = SupabaseStore::new(&config).unwrap();
//! ```

use crate::config::SupabaseConfig;
use crate::postgrest::{in_filter, pairs_filter, parse_content_range_total};
use crate::StoreError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use ssb_domain::{
    InteractionRecord, InteractionStore, LookupError, Pair, SubstanceCounts, SubstanceId,
    SubstanceStore, SubstanceType,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Table holding one row per substance
pub const SUBSTANCES_TABLE: &str = "checker_substances";

/// Table holding one row per canonical interaction pair
pub const INTERACTIONS_TABLE: &str = "checker_interactions";

/// Supabase-backed substance and interaction store
///
/// Construct once at startup and share (it wraps a pooled `reqwest::Client`).
pub struct SupabaseStore {
    rest_url: String,
    api_key: String,
    client: reqwest::Client,
    max_attempts: u32,
    retry_backoff: Duration,
}

/// Row shape for substance type lookups
#[derive(Deserialize)]
struct SubstanceRow {
    substance_id: SubstanceId,
    #[serde(rename = "type")]
    substance_type: Option<String>,
}

impl SupabaseStore {
    /// Create a store from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::Config("Supabase URL is empty".to_string()));
        }
        if config.api_key.is_empty() {
            return Err(StoreError::Config("Supabase API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            rest_url: format!("{}/rest/v1", config.url.trim().trim_end_matches('/')),
            api_key: config.api_key.clone(),
            client,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: config.retry_backoff(),
        })
    }

    /// Base URL of the REST API
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request, retrying transient failures
    async fn send(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let error = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    StoreError::Status { status, body }
                }
                Err(e) => StoreError::from(e),
            };

            if !error.is_transient() || attempts >= self.max_attempts {
                return Err(error);
            }

            let delay = backoff_delay(self.retry_backoff, attempts);
            warn!(
                "Supabase request failed (attempt {}/{}): {}; retrying in {:?}",
                attempts, self.max_attempts, error, delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .send(|| self.request(reqwest::Method::GET, table).query(query))
            .await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e)))
    }

    async fn count(&self, table: &str, query: &[(&str, String)]) -> Result<u64, StoreError> {
        let response = self
            .send(|| {
                self.request(reqwest::Method::HEAD, table)
                    .query(query)
                    .header("Prefer", "count=exact")
            })
            .await?;

        let header = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StoreError::InvalidResponse("Missing Content-Range header".to_string()))?;

        parse_content_range_total(header).ok_or_else(|| {
            StoreError::InvalidResponse(format!("Unparseable Content-Range: {}", header))
        })
    }

    async fn count_active(&self, substance_type: SubstanceType) -> Result<u64, StoreError> {
        self.count(
            SUBSTANCES_TABLE,
            &[
                ("select", "substance_id".to_string()),
                ("type", format!("eq.{}", substance_type.as_str())),
                ("is_active", "eq.true".to_string()),
            ],
        )
        .await
    }
}

/// Delay before retrying after `attempt` failures: base, 2x base, 4x base, ...
///
/// Saturates instead of overflowing for large attempt counts.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

#[async_trait]
impl SubstanceStore for SupabaseStore {
    async fn lookup_types(
        &self,
        ids: &[SubstanceId],
    ) -> Result<HashMap<SubstanceId, SubstanceType>, LookupError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<SubstanceRow> = self
            .select(
                SUBSTANCES_TABLE,
                &[
                    ("select", "substance_id,type".to_string()),
                    ("substance_id", in_filter(ids)),
                ],
            )
            .await?;
        debug!("Substance lookup returned {} of {} ids", rows.len(), ids.len());

        let mut types = HashMap::with_capacity(rows.len());
        for row in rows {
            match row.substance_type.as_deref().and_then(SubstanceType::parse) {
                Some(ty) => {
                    types.insert(row.substance_id, ty);
                }
                None => debug!(
                    "Substance {} has unrecognized type {:?}",
                    row.substance_id, row.substance_type
                ),
            }
        }

        Ok(types)
    }

    async fn substance_counts(&self) -> Result<SubstanceCounts, LookupError> {
        let supplements = self.count_active(SubstanceType::Supplement).await?;
        let drugs = self.count_active(SubstanceType::Drug).await?;

        Ok(SubstanceCounts { supplements, drugs })
    }
}

#[async_trait]
impl InteractionStore for SupabaseStore {
    async fn lookup_interactions(
        &self,
        pairs: &[Pair],
    ) -> Result<Vec<InteractionRecord>, LookupError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let filter = pairs_filter(pairs);
        debug!("Interaction filter covers {} pairs", pairs.len());

        let records = self
            .select(
                INTERACTIONS_TABLE,
                &[("select", "*".to_string()), ("or", filter)],
            )
            .await?;

        Ok(records)
    }
}
