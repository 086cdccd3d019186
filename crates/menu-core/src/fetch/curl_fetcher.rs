//! libcurl-backed menu document GET.

use std::time::Duration;

use super::{FetchError, FetchResponse, MenuFetcher};
use crate::config::FetchConfig;
use crate::control::AbortToken;

/// Headers sent with every request so intermediaries revalidate.
const NO_CACHE_HEADERS: [&str; 2] = ["Cache-Control: no-cache", "Pragma: no-cache"];

/// Hard cap on a menu document body.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(cfg: &FetchConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
        }
    }

    fn perform(&self, url: &str, abort: &AbortToken) -> Result<FetchResponse, curl::Error> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.progress(true)?;

        let mut list = curl::easy::List::new();
        for header in NO_CACHE_HEADERS {
            list.append(header)?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if body.len() + data.len() > MAX_BODY_BYTES {
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            // Returning false aborts the transfer with CURLE_ABORTED_BY_CALLBACK.
            transfer.progress_function(|_, _, _, _| !abort.is_aborted())?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(FetchResponse { status, body })
    }
}

impl MenuFetcher for CurlFetcher {
    fn get(&self, url: &str, abort: &AbortToken) -> Result<FetchResponse, FetchError> {
        if abort.is_aborted() {
            return Err(FetchError::Cancelled);
        }
        tracing::debug!(url, "GET menu document");
        match self.perform(url, abort) {
            Ok(resp) => Ok(resp),
            Err(_) if abort.is_aborted() => Err(FetchError::Cancelled),
            Err(e) => Err(FetchError::Transport(e.to_string())),
        }
    }
}
