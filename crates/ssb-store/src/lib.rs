//! Supplement Safety Bible Storage Layer
//!
//! Implements the `SubstanceStore` and `InteractionStore` traits from
//! `ssb-domain`.
//!
//! # Stores
//!
//! - `SupabaseStore`: reads `checker_substances` and `checker_interactions`
//!   through the Supabase REST (PostgREST) API
//! - `MemoryStore`: in-process store for tests and local development
//!
//! # Examples
//!
//! ```
//! use ssb_domain::{Mode, StackChecker, SubstanceType};
//! use ssb_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(
//!     MemoryStore::new()
//!         .with_substance("D_WARFARIN", SubstanceType::Drug)
//!         .with_substance("S_GINKGO", SubstanceType::Supplement),
//! );
//! let checker = StackChecker::new(store.clone(), store);
//! # let _ = (checker, Mode::default());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod memory;
pub mod postgrest;
pub mod supabase;

use ssb_domain::LookupError;
use thiserror::Error;

pub use config::SupabaseConfig;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status from the REST API
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Store could not be constructed from its configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Communication(_) | StoreError::Timeout => true,
            StoreError::Status { status, .. } => *status == 429 || *status >= 500,
            StoreError::InvalidResponse(_) | StoreError::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_decode() {
            StoreError::InvalidResponse(e.to_string())
        } else {
            StoreError::Communication(e.to_string())
        }
    }
}

impl From<StoreError> for LookupError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Timeout => LookupError::Timeout,
            StoreError::InvalidResponse(msg) => LookupError::InvalidResponse(msg),
            other => LookupError::Communication(other.to_string()),
        }
    }
}
