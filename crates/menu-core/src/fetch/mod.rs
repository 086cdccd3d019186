//! Fetch boundary for menu documents.
//!
//! The loader only depends on `MenuFetcher`; the curl-backed implementation
//! lives in `curl_fetcher`. Implementations are blocking and are driven from
//! `spawn_blocking`.

mod curl_fetcher;

pub use curl_fetcher::CurlFetcher;

use crate::control::AbortToken;

/// Raw HTTP outcome: status plus body bytes (body may be empty on errors).
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Abort token was raised before the transfer finished.
    #[error("request cancelled")]
    Cancelled,
    /// DNS, connect, TLS or timeout failure; no HTTP status available.
    #[error("transport: {0}")]
    Transport(String),
}

/// GET a URL with cache-bypass semantics.
///
/// Implementations must check `abort` while the transfer runs and return
/// `FetchError::Cancelled` once it is raised.
pub trait MenuFetcher: Send + Sync {
    fn get(&self, url: &str, abort: &AbortToken) -> Result<FetchResponse, FetchError>;
}
