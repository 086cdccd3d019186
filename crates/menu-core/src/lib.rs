pub mod config;
pub mod logging;

pub mod control;
pub mod fetch;
pub mod listener;
pub mod loader;
pub mod menu;
pub mod resolver;
pub mod session;
pub mod stamp;
pub mod url_model;
