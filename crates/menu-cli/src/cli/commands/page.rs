//! Building the page a command operates on.

use anyhow::{Context, Result};
use menu_core::config::MenuConfig;
use menu_core::resolver::{IdentifierResolver, MemoryHistory, NavigateOptions};
use std::sync::Arc;
use url::Url;

/// A resolver over an in-memory history, as a mounted page would have.
pub(super) struct Page {
    pub history: Arc<MemoryHistory>,
    pub resolver: IdentifierResolver,
}

impl Page {
    /// Mount at `url` directly.
    pub fn open(cfg: &MenuConfig, url: Url) -> Self {
        let history = Arc::new(MemoryHistory::new(url));
        let resolver = IdentifierResolver::with_history(
            Arc::clone(&history),
            cfg.known_set(),
            cfg.query_param.clone(),
        );
        Self { history, resolver }
    }

    /// Mount at `target` if it is an http(s) URL; otherwise mount at the
    /// deployment base and navigate to `target` as a menu name.
    pub fn open_target(cfg: &MenuConfig, target: &str, push: bool) -> Result<Self> {
        if let Some(url) = page_url(target) {
            return Ok(Self::open(cfg, url));
        }
        let base = cfg.base().context("cannot build page URL")?;
        let page = Self::open(cfg, base);
        let opts = if push {
            NavigateOptions::push()
        } else {
            NavigateOptions::default()
        };
        page.resolver.navigate_to(target, opts);
        Ok(page)
    }
}

/// `target` as a page URL. Names such as `bar:grill` parse with a custom
/// scheme and are not pages.
fn page_url(target: &str) -> Option<Url> {
    Url::parse(target)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
