//! Request handler module
//!
//! Routing dispatch plus the two content handlers: template-rendered pages
//! and static files.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
