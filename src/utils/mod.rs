pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{ensure_http_scheme, has_http_scheme, is_data_url};
