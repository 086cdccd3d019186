//! `menu show <target>` – resolve, load and print a menu.

use anyhow::{bail, Context, Result};
use menu_core::config::MenuConfig;
use menu_core::fetch::CurlFetcher;
use menu_core::listener::{AnalyticsListener, DocumentTitle, TitleListener};
use menu_core::loader::{LoadState, MenuLoader};
use menu_core::menu::price::format_price;
use menu_core::menu::{Item, MenuResource};
use std::fmt::Write as _;
use std::sync::Arc;

use super::page::Page;

pub async fn run_show(cfg: &MenuConfig, target: &str, push: bool) -> Result<()> {
    let page = Page::open_target(cfg, target, push)?;
    let resolver = &page.resolver;

    if resolver.is_missing() {
        bail!(
            "no menu selected; add ?{}=<menu> to the URL (see `menu known`)",
            cfg.query_param
        );
    }
    let Some(id) = resolver.current_identifier() else {
        bail!(
            "menu {:?} does not exist (see `menu known`)",
            resolver.state().raw
        );
    };

    let fetcher = CurlFetcher::new(&cfg.fetch_or_default());
    let loader = MenuLoader::new(Arc::new(fetcher), cfg.base()?);
    let title = DocumentTitle::new(cfg.title_suffix.clone());
    loader.add_listener(Arc::new(TitleListener::new(
        title.clone(),
        cfg.title_suffix.clone(),
    )));
    loader.add_listener(Arc::new(AnalyticsListener::new("cli")));

    loader.load(id.as_str()).wait().await;

    match loader.state() {
        LoadState::Loaded { menu, .. } => {
            println!("{}", title.get());
            print!("{}", render_menu(&menu));
            Ok(())
        }
        LoadState::Failed(err) => {
            Err(anyhow::anyhow!("{err}")).context(err.user_message())
        }
        other => bail!("menu load did not settle: {other:?}"),
    }
}

/// Plain-text rendering: groupings, categories, sections and visible items.
pub(crate) fn render_menu(menu: &MenuResource) -> String {
    let r = &menu.restaurant;
    let mut out = String::new();
    if let Some(subtitle) = r.subtitle.as_deref() {
        let _ = writeln!(out, "{subtitle}");
    }
    if let Some(address) = r.address.as_deref() {
        let _ = writeln!(out, "{address}");
    }

    for group in &menu.menus {
        let _ = writeln!(out, "\n== {} ==", group.label);
        for category in &group.categories {
            let _ = writeln!(out, "\n-- {} --", category.label);
            for item in category.items.iter().filter(|i| i.is_displayed()) {
                render_item(&mut out, item, &r.currency, &r.locale, "  ");
            }
            for section in &category.sections {
                let _ = writeln!(out, "  [{}]", section.label);
                for item in section.items.iter().filter(|i| i.is_displayed()) {
                    render_item(&mut out, item, &r.currency, &r.locale, "    ");
                }
            }
        }
    }

    if !menu.additional_links.is_empty() || !menu.social_media.is_empty() {
        out.push('\n');
    }
    for link in &menu.additional_links {
        let _ = writeln!(out, "{}: {}", link.label, link.url);
    }
    for social in &menu.social_media {
        let _ = writeln!(out, "{}: {}", social.name, social.url);
    }
    out
}

fn render_item(out: &mut String, item: &Item, currency: &str, locale: &str, indent: &str) {
    let price = format_price(item.price, currency, locale);
    let _ = write!(out, "{indent}{:<36} {price:>12}", item.name);
    if let Some(labels) = item.labels.as_ref().filter(|l| !l.is_empty()) {
        let _ = write!(out, "  ({})", labels.join(", "));
    }
    out.push('\n');
    if let Some(desc) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "{indent}  {}", desc.trim());
    }
}
