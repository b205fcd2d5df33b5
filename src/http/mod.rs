//! HTTP protocol layer module
//!
//! Response builders shared by the router and the hero handlers, decoupled
//! from the store.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_empty_json_response, build_empty_response,
    build_json_response,
};
