//! `menu known` – list known menus.

use anyhow::Result;
use menu_core::config::MenuConfig;
use menu_core::resolver::menu_page_url;
use menu_core::url_model::Identifier;

pub fn run_known(cfg: &MenuConfig) -> Result<()> {
    let known = cfg.known_set();
    if known.is_empty() {
        println!("No known menus. Add ids to known_menus in the config file.");
        return Ok(());
    }
    let base = cfg.base()?;
    for id in known.iter() {
        match Identifier::parse(id) {
            Ok(id) => println!("{:<24} {}", id, menu_page_url(&base, &cfg.query_param, &id)),
            Err(e) => println!("{:<24} (skipped: {e})", id),
        }
    }
    Ok(())
}
