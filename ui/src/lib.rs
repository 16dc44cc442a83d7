//! Yew bindings for url fetching with lifecycle-scoped cancellation.

use fetch_client::HttpTransport;

pub mod hooks;
pub mod logs;

pub use hooks::{FetchHookReturn, use_url_fetch, use_url_fetch_with};

/// Transport for same-origin requests: relative urls resolve against the
/// page's origin.
pub fn get_transport() -> HttpTransport {
    let address = web_sys::window()
        .and_then(|window| window.location().origin().ok());

    HttpTransport {
        address,
        inner_client: reqwest::Client::new(),
    }
}
