//! Policy Dashboard
//!
//! Browser front end for the policy analytics API, built with Leptos (WASM).
//!
//! # Features
//!
//! - Document upload with automatic refresh of every listing
//! - Files table with extracted policies, web enrichment and comments
//! - File type pie chart and policy cluster bar chart
//! - Login and registration
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! The view state and reducer come from the `policy-dashboard` crate; this
//! crate only adds HTTP calls (`gloo-net`) and the components.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
