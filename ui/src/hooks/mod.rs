pub mod use_url_fetch;

pub use use_url_fetch::{FetchHookReturn, use_url_fetch, use_url_fetch_with};
