pub mod action;
pub mod app {
    pub mod commands;
    pub mod router;
    pub mod session;
}
pub mod checks;
pub mod config;
pub mod exec;
pub mod menu;
pub mod picker;
pub mod scanner;
pub mod view;
