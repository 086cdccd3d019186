//! CLI command handlers. Each command is in its own file.

mod known;
mod page;
mod resolve;
mod show;
mod stamp;

pub use known::run_known;
pub use resolve::run_resolve;
pub use show::run_show;
pub use stamp::run_stamp;

#[cfg(test)]
pub(crate) use show::render_menu;
