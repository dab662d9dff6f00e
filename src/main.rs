//! TaskNest Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod debounce;
mod filters;
mod markdown;
mod models;
mod queries;
mod selection;
mod session;
mod stats;
mod store;
mod theme;
mod validation;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = console_logger::init(level);
    mount_to_body(App);
}
