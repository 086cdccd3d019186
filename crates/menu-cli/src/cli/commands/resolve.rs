//! `menu resolve <url>` – show how a page URL resolves.

use anyhow::{Context, Result};
use menu_core::config::MenuConfig;
use menu_core::resolver::UrlProvider;
use url::Url;

use super::page::Page;

pub fn run_resolve(cfg: &MenuConfig, url: &str) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("invalid page URL: {url}"))?;
    let page = Page::open(cfg, url);
    let state = page.resolver.state();

    println!("raw:        {:?}", state.raw);
    println!("normalized: {:?}", state.normalized);
    let status = if state.is_missing() {
        "missing"
    } else if state.is_invalid() {
        "unknown"
    } else {
        "ok"
    };
    println!("status:     {status}");
    println!("page URL:   {}", page.history.current_url());
    Ok(())
}
