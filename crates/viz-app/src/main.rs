//! WASM entry point for the statistics demo

mod app;
mod demo;
mod fetch;
mod mock;

use app::App;
use leptos::mount::mount_to_body;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("starting statistics demo");

    mount_to_body(App);
}
