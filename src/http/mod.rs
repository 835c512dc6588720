//! HTTP protocol layer module
//!
//! Response building and cache-control primitives, decoupled from the
//! page/API-doc business logic.

pub mod cache;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_405_response, build_500_response, build_html_response,
    build_options_response, build_raw_response, build_redirect_response,
};
