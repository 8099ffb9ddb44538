//! Helper functions shared by the page renderer, the exporter and the server

mod url;

pub use url::*;
