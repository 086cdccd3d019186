pub mod menu_server;
