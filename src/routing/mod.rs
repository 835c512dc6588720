//! Routing module
//!
//! Path-based routing primitives: the compiled legacy redirect table.

mod redirects;

pub use redirects::RedirectTable;
