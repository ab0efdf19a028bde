//! strategy-builder Web Frontend
//!
//! Leptos-based WASM frontend for the strategy wizard. Talks to
//! `strategy-server` over its JSON API.

mod api;
mod app;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
