#![allow(warnings)]
//! Grocery List Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod form;
mod models;
mod mutations;
mod query;
mod sample_items;
mod store;
mod table;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::load();
    if let Err(err) = rolling_logger::init_logger("GroceryList", config.log_capacity, tracing::Level::INFO) {
        web_sys::console::error_1(&format!("[APP] Logger init failed: {}", err).into());
    }
    mount_to_body(move || view! { <App config=config.clone() /> });
}
