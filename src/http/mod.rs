//! HTTP protocol layer
//!
//! Protocol-level helpers shared by the page and static file handlers:
//! MIME detection, cache validators, range parsing, and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::parse_range;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_500_response, build_health_response, build_options_response,
};
