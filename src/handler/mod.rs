//! Request handler module
//!
//! Responsible for request routing dispatch and the public endpoints.

pub mod endpoints;
pub mod router;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main entry point
pub use router::handle_request;
